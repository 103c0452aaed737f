//! 双向分页
//!
//! 游标中的偏移量始终从排序序列头部（成员最多的房间）起算，而不是相对上
//! 一页的增量，因此同一个整数可以同时服务两个方向：先向前翻再向后翻，
//! 会回到原来的边界。

use domain::StreamPosition;

use crate::cursor::RoomListCursor;
use crate::ranking::RankedRoom;

/// 本页选中的房间与相邻游标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    /// 按离游标边界由近到远排列，尚未按排序键重排
    pub rooms: Vec<RankedRoom>,
    pub next_cursor: Option<RoomListCursor>,
    pub prev_cursor: Option<RoomListCursor>,
}

/// 从完整排序序列中选出本页
///
/// `limit` 为 0 等同于不限制；计算出的新偏移为 0 时不签发游标。
pub fn select_page(
    ranked: &[RankedRoom],
    cursor: Option<RoomListCursor>,
    limit: Option<usize>,
    stream_position: StreamPosition,
) -> PageSelection {
    let forward = cursor.map_or(true, |cursor| cursor.forward);
    let offset = cursor.map_or(0, |cursor| cursor.offset);

    let mut window: Vec<&RankedRoom> = if forward {
        ranked.iter().skip(offset).collect()
    } else {
        ranked.iter().take(offset).rev().collect()
    };

    let mut new_offset = None;
    if let Some(limit) = limit.filter(|limit| *limit > 0) {
        if window.len() > limit {
            new_offset = Some(if forward {
                offset.saturating_add(limit)
            } else {
                offset.saturating_sub(limit)
            });
        }
        window.truncate(limit);
    }
    let new_offset = new_offset.filter(|offset| *offset > 0);

    let issued = |forward: bool| {
        new_offset.map(|offset| RoomListCursor::new(stream_position, offset, forward))
    };

    let (next_cursor, prev_cursor) = if forward {
        (
            issued(true),
            cursor.map(|cursor| cursor.with_direction(false)),
        )
    } else {
        (
            cursor.map(|cursor| cursor.with_direction(true)),
            issued(false),
        )
    };

    PageSelection {
        rooms: window.into_iter().cloned().collect(),
        next_cursor,
        prev_cursor,
    }
}
