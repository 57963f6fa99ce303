#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Help,
    Theme,
    Back,
    Home,
    Browse,
    Post,
    SignIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Select,
    NextField,
    PreviousField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    Focus,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Status,
    Sort,
    Category,
    Location,
    Reset,
    CopyContact,
    Reload,
    ToggleStatus,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Submit,
    Cycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Dismiss,
    Confirm,
    Cancel,
}
