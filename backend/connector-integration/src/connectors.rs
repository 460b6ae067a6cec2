pub mod fortis;

pub use self::fortis::Fortis;
