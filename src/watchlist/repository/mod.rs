pub mod watch_list_repository;
