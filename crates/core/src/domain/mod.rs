pub mod period;
pub mod record;
pub mod selection;

pub use period::EarningsPeriod;
pub use record::{
    Category, EngagementTips, Keyword, MarketingRecord, OpportunityRecord, OutboundEmail,
    SummaryRecord, TargetBuyer, NO_DATA,
};
pub use selection::Selection;
