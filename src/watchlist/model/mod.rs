pub mod watch_item;
