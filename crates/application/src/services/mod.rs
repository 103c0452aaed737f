mod room_list_service;


pub use room_list_service::{DirectoryAggregator, RoomListService, RoomListServiceDependencies};
