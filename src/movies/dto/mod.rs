pub mod movie_dto;
