/// Lifecycle of one open file inside the editor session.
///
/// `Uninitialized -> Initializing -> Active <-> Saving`; a file that is open but not
/// rendered is `Background` and lives in the stores only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Uninitialized,
    Initializing,
    Active,
    Background,
    Saving,
}

impl FileState {
    pub fn is_saving(self) -> bool {
        self == FileState::Saving
    }
}
