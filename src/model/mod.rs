pub mod retro;
pub mod tick;
