//! Value objects - immutable, validated-by-construction domain values

mod notice;
mod power_counter;
mod recharge;
mod role;

pub use notice::{Announcement, Notice, NoticeLevel};
pub use power_counter::{Decremented, PowerCounter};
pub use recharge::RechargeSchedule;
pub use role::{Requester, UserRole};
