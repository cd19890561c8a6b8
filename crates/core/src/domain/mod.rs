pub mod conversation;
pub mod intent;
pub mod satisfaction;
pub mod sentiment;
pub mod telecom;
pub mod tool;
