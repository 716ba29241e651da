mod directory;

pub use directory::{DirectoryUser, PgUserDirectory, UserDirectory};
