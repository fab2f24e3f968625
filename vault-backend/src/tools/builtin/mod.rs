mod change_note_title;
mod create_note;
mod delete_note;
mod edit_note;
mod list_relevant_notes;
mod read_note;

pub use change_note_title::ChangeNoteTitleTool;
pub use create_note::CreateNoteTool;
pub use delete_note::DeleteNoteTool;
pub use edit_note::EditNoteTool;
pub use list_relevant_notes::ListRelevantNotesTool;
pub use read_note::ReadNoteTool;
