pub mod assets;
pub mod icon;
