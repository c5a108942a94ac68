pub mod relocate;
