mod confirm_dialog;
mod list;
mod search_box;
mod table;
mod text_input;

pub use confirm_dialog::{ConfirmDialog, ConfirmEvent};
pub use list::{List, ListEvent, ListRow};
pub use search_box::{SearchBox, SearchBoxEvent, SuggestionRow};
pub use table::{ColumnDef, Table, TableEvent, TableRow};
pub use text_input::{TextInput, TextInputEvent};
