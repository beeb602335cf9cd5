//! Vendor capabilities consulted before a vendor may bid on or take a work order.
//!
//! `WorkOrder` only stores vendor ids; whether a vendor covers a trade and an
//! area is answered here, behind [`VendorQualification`].

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use tracing::warn;

use doorx_core::VendorId;
use doorx_work_orders::ServiceCategory;

use crate::repository::RepositoryError;

/// Answers whether a vendor can take work of `category` at `zip_code`.
pub trait VendorQualification: Send + Sync {
    fn can_service(&self, vendor_id: VendorId, category: ServiceCategory, zip_code: &str) -> bool;
}

impl<T: VendorQualification + ?Sized> VendorQualification for Arc<T> {
    fn can_service(&self, vendor_id: VendorId, category: ServiceCategory, zip_code: &str) -> bool {
        (**self).can_service(vendor_id, category, zip_code)
    }
}

/// Trades and ZIP codes a vendor covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorProfile {
    categories: BTreeSet<ServiceCategory>,
    zip_codes: BTreeSet<String>,
    available: bool,
}

impl VendorProfile {
    pub fn new<Z>(
        categories: impl IntoIterator<Item = ServiceCategory>,
        zip_codes: impl IntoIterator<Item = Z>,
    ) -> Self
    where
        Z: Into<String>,
    {
        Self {
            categories: categories.into_iter().collect(),
            zip_codes: zip_codes.into_iter().map(Into::into).collect(),
            available: true,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn can_service(&self, category: ServiceCategory, zip_code: &str) -> bool {
        self.available
            && self.categories.contains(&category)
            && self.zip_codes.contains(zip_code.trim())
    }
}

/// Vendor profiles kept in process. Unknown vendors qualify for nothing.
#[derive(Debug, Default)]
pub struct InMemoryVendorDirectory {
    vendors: RwLock<HashMap<VendorId, VendorProfile>>,
}

impl InMemoryVendorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the profile of `vendor_id`.
    pub fn register(&self, vendor_id: VendorId, profile: VendorProfile) -> Result<(), RepositoryError> {
        let mut vendors = self.vendors.write().map_err(|_| RepositoryError::Poisoned)?;
        vendors.insert(vendor_id, profile);
        Ok(())
    }

    pub fn set_available(&self, vendor_id: VendorId, available: bool) -> Result<(), RepositoryError> {
        let mut vendors = self.vendors.write().map_err(|_| RepositoryError::Poisoned)?;
        let profile = vendors
            .get_mut(&vendor_id)
            .ok_or(RepositoryError::NotFound(vendor_id.into()))?;
        profile.set_available(available);
        Ok(())
    }

    pub fn profile(&self, vendor_id: VendorId) -> Result<Option<VendorProfile>, RepositoryError> {
        let vendors = self.vendors.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(vendors.get(&vendor_id).cloned())
    }
}

impl VendorQualification for InMemoryVendorDirectory {
    fn can_service(&self, vendor_id: VendorId, category: ServiceCategory, zip_code: &str) -> bool {
        match self.vendors.read() {
            Ok(vendors) => vendors
                .get(&vendor_id)
                .is_some_and(|p| p.can_service(category, zip_code)),
            Err(_) => {
                warn!(vendor_id = %vendor_id, "vendor directory lock poisoned; refusing");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hvac_in_miami() -> VendorProfile {
        VendorProfile::new([ServiceCategory::Hvac, ServiceCategory::Electrical], ["33101"])
    }

    #[test]
    fn matching_category_and_area_qualifies() {
        assert!(hvac_in_miami().can_service(ServiceCategory::Hvac, "33101"));
        assert!(hvac_in_miami().can_service(ServiceCategory::Hvac, " 33101 "));
    }

    #[test]
    fn category_and_area_must_both_match() {
        let profile = hvac_in_miami();
        assert!(!profile.can_service(ServiceCategory::Plumbing, "33101"));
        assert!(!profile.can_service(ServiceCategory::Hvac, "90210"));
    }

    #[test]
    fn unavailable_vendor_qualifies_for_nothing() {
        let mut profile = hvac_in_miami();
        profile.set_available(false);
        assert!(!profile.is_available());
        assert!(!profile.can_service(ServiceCategory::Hvac, "33101"));
    }

    #[test]
    fn directory_answers_per_vendor() {
        let directory = Arc::new(InMemoryVendorDirectory::new());
        let known = VendorId::new();
        directory.register(known, hvac_in_miami()).unwrap();

        assert!(directory.can_service(known, ServiceCategory::Hvac, "33101"));
        assert!(!directory.can_service(VendorId::new(), ServiceCategory::Hvac, "33101"));

        directory.set_available(known, false).unwrap();
        assert!(!directory.can_service(known, ServiceCategory::Hvac, "33101"));
        assert_eq!(
            directory.profile(known).unwrap().map(|p| p.is_available()),
            Some(false)
        );
    }

    #[test]
    fn toggling_unknown_vendor_is_not_found() {
        let directory = InMemoryVendorDirectory::new();
        let vendor_id = VendorId::new();
        assert_eq!(
            directory.set_available(vendor_id, true).unwrap_err(),
            RepositoryError::NotFound(vendor_id.into())
        );
    }
}
