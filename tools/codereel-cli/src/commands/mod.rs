pub mod check;
pub mod gif;
pub mod record;
pub mod settings;
