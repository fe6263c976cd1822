pub mod phonepe;

pub use phonepe::Phonepe;
