pub mod add;
pub mod ls;
pub mod merge;
pub mod pages;
pub mod rm;
pub mod rotate;
pub mod slice;
