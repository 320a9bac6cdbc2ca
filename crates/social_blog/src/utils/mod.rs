pub mod errors;
pub mod password;
pub mod slug;
