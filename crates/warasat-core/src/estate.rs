//! The estate under distribution: the state every computation reads from.
//!
//! [`Estate`] owns the inheritor and property lists. Every membership change
//! re-runs the [`ShareAllocator`] before returning, so shares are never stale;
//! settlement is computed on demand from the current snapshot.

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::allocation::{Allocation, ShareAllocator};
use crate::error::EstateError;
use crate::party::{Inheritor, Relation};
use crate::property::{Property, PropertyDraft};
use crate::settlement::{PartyFinancials, SettlementMatcher, SettlementPlan, Transfer};

#[derive(Debug, Clone, Default, Serialize)]
pub struct Estate {
    pub deceased_name: String,
    inheritors: Vec<Inheritor>,
    properties: Vec<Property>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Estate {
    pub fn new(deceased_name: impl Into<String>) -> Self {
        Self {
            deceased_name: deceased_name.into(),
            ..Default::default()
        }
    }

    pub fn inheritors(&self) -> &[Inheritor] {
        &self.inheritors
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn inheritor(&self, id: &str) -> Option<&Inheritor> {
        self.inheritors.iter().find(|h| h.id == id)
    }

    pub fn property(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    // ── Inheritors ──

    /// Add an inheritor under a generated id and recompute all shares.
    pub fn add_inheritor(
        &mut self,
        name: impl Into<String>,
        relation: Relation,
    ) -> Result<String, EstateError> {
        let id = new_id();
        self.insert_inheritor(Inheritor::new(id.clone(), name, relation))?;
        Ok(id)
    }

    /// Add an inheritor with a caller-chosen id and recompute all shares.
    pub fn insert_inheritor(&mut self, inheritor: Inheritor) -> Result<(), EstateError> {
        if inheritor.name.trim().is_empty() {
            return Err(EstateError::EmptyName);
        }
        if self.inheritor(&inheritor.id).is_some() {
            return Err(EstateError::DuplicateId(inheritor.id));
        }
        self.inheritors.push(inheritor);
        self.reallocate();
        Ok(())
    }

    /// Remove an inheritor, release any properties assigned to them, and
    /// recompute the remaining shares.
    pub fn remove_inheritor(&mut self, id: &str) -> Result<Inheritor, EstateError> {
        let idx = self
            .inheritors
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| EstateError::UnknownInheritor(id.to_string()))?;
        let removed = self.inheritors.remove(idx);

        for property in self.properties.iter_mut().filter(|p| p.is_assigned_to(id)) {
            debug!(property = %property.id, inheritor = id, "assignment released");
            property.assigned_to = None;
        }

        self.reallocate();
        Ok(removed)
    }

    fn reallocate(&mut self) {
        self.inheritors = ShareAllocator::default()
            .allocate(&self.inheritors)
            .into_inheritors();
        debug!(inheritors = self.inheritors.len(), "shares recomputed");
    }

    /// Allocation report for the current inheritors, including any
    /// unallocated remainder. Logs a warning when part of the estate is
    /// left undistributed.
    pub fn allocation(&self) -> Allocation {
        let allocation = ShareAllocator::default().allocate(&self.inheritors);
        if !allocation.is_complete() && !allocation.inheritors().is_empty() {
            warn!(
                unallocated = allocation.unallocated(),
                "incomplete distribution: no rule covers part of the estate"
            );
        }
        allocation
    }

    // ── Properties ──

    /// Add a property under a generated id. Its current and original value
    /// both start at `rate x area`.
    pub fn add_property(&mut self, draft: PropertyDraft) -> Result<String, EstateError> {
        let id = new_id();
        self.insert_property(id.clone(), draft)?;
        Ok(id)
    }

    /// Add a property with a caller-chosen id.
    pub fn insert_property(
        &mut self,
        id: impl Into<String>,
        draft: PropertyDraft,
    ) -> Result<(), EstateError> {
        let id = id.into();
        if draft.name.trim().is_empty() {
            return Err(EstateError::EmptyName);
        }
        if self.property(&id).is_some() {
            return Err(EstateError::DuplicateId(id));
        }
        let property = Property::from_draft(id, draft);
        debug!(
            property = %property.id,
            total_value = property.total_value,
            source = property.valuation.source.as_str(),
            "property added"
        );
        self.properties.push(property);
        Ok(())
    }

    pub fn remove_property(&mut self, id: &str) -> Result<Property, EstateError> {
        let idx = self
            .properties
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| EstateError::UnknownProperty(id.to_string()))?;
        Ok(self.properties.remove(idx))
    }

    fn property_mut(&mut self, id: &str) -> Result<&mut Property, EstateError> {
        self.properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| EstateError::UnknownProperty(id.to_string()))
    }

    /// Assign a property to an inheritor, or clear the assignment with `None`.
    pub fn assign(
        &mut self,
        property_id: &str,
        inheritor_id: Option<&str>,
    ) -> Result<(), EstateError> {
        if let Some(heir) = inheritor_id
            && self.inheritor(heir).is_none()
        {
            return Err(EstateError::UnknownInheritor(heir.to_string()));
        }
        let property = self.property_mut(property_id)?;
        property.assigned_to = inheritor_id.map(str::to_string);
        Ok(())
    }

    /// Replace a property's deal value. Rate and original valuation are kept.
    pub fn renegotiate(&mut self, property_id: &str, total_value: f64) -> Result<(), EstateError> {
        let property = self.property_mut(property_id)?;
        debug!(
            property = property_id,
            from = property.total_value,
            to = total_value,
            "value renegotiated"
        );
        property.renegotiate(total_value);
        Ok(())
    }

    // ── Settlement ──

    /// Sum of the current value of every property.
    pub fn total_value(&self) -> f64 {
        self.properties.iter().map(|p| p.total_value).sum()
    }

    /// Each inheritor's target share of the estate against what they hold.
    pub fn financials(&self) -> Vec<PartyFinancials> {
        let total = self.total_value();
        self.inheritors
            .iter()
            .map(|heir| {
                let held: Vec<&Property> = self
                    .properties
                    .iter()
                    .filter(|p| p.is_assigned_to(&heir.id))
                    .collect();
                PartyFinancials {
                    id: heir.id.clone(),
                    name: heir.name.clone(),
                    target_value: heir.target_value(total),
                    assigned_value: held.iter().map(|p| p.total_value).sum(),
                    assigned_properties: held.iter().map(|p| p.id.clone()).collect(),
                }
            })
            .collect()
    }

    pub fn settlement_plan(&self, matcher: &SettlementMatcher) -> SettlementPlan {
        matcher.plan(&self.financials())
    }

    pub fn settle(&self, matcher: &SettlementMatcher) -> Vec<Transfer> {
        matcher.settle(&self.financials())
    }

    pub fn unassigned_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.assigned_to.is_none())
    }
}
