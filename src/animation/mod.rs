pub mod scroller;
pub mod transition;
