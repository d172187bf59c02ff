pub mod click;
pub mod element;
pub mod keyboard;
pub mod scroll;
pub mod wait;
