pub mod descriptor;
pub mod kind;
