//! Listing board with category and free-text filters.

use creth_router::Route;
use creth_types::listing::{Listing, ListingCategory};

use crate::{catalog, AppContext};

/// Category chip selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ListingCategory),
}

impl CategoryFilter {
    /// Parse a chip label: `"All"` or a category name.
    pub fn from_label(label: &str) -> Self {
        ListingCategory::from_name(label).map_or(CategoryFilter::All, CategoryFilter::Only)
    }

    pub fn admits(&self, listing: &Listing) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => listing.category == *category,
        }
    }
}

pub struct ExploreView {
    listings: Vec<Listing>,
    category: CategoryFilter,
    search: String,
}

impl Default for ExploreView {
    fn default() -> Self {
        Self::new(catalog::listings())
    }
}

impl ExploreView {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings,
            category: CategoryFilter::All,
            search: String::new(),
        }
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Listings passing both filters, in catalog order.
    pub fn results(&self) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| self.category.admits(l) && l.matches_text(&self.search))
            .collect()
    }

    pub fn select_listing(&self, ctx: &mut AppContext, id: &str) -> Route {
        ctx.navigate_to(&Route::ListingDetail { id: id.to_string() })
    }
}
