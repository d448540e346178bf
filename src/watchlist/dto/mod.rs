pub mod add_watch_item_dto;
