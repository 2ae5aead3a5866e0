// Chat export archive: typed records and the loader that reads them.

pub mod loader;
pub mod models;
