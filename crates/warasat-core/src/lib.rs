pub mod allocation;
pub mod error;
pub mod estate;
pub mod numeric;
pub mod party;
pub mod property;
pub mod settlement;
pub mod trends;

pub use allocation::{Allocation, ShareAllocator, ShareBasis, allocate_shares};
pub use error::EstateError;
pub use estate::Estate;
pub use numeric::parse_amount;
pub use party::{Inheritor, Relation};
pub use property::{Location, Property, PropertyDraft, PropertyType, Valuation, ValuationSource};
pub use settlement::{PartyFinancials, SettlementMatcher, SettlementPlan, Transfer};
pub use trends::history;
