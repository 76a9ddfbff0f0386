pub mod artist;
pub mod prelude;
pub mod show;
pub mod string_list;
pub mod venue;
