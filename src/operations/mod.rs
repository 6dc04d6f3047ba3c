pub mod frametify;
pub mod offset;
pub mod split;
