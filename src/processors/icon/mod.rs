pub mod discovery;
pub mod install;
pub mod manifest;
pub mod resizer;
pub mod structs;
