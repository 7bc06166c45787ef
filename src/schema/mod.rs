pub mod language;
pub mod occasion;
pub mod options;
pub mod template;
