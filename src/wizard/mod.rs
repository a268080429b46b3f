//! Three-step guidance wizard.
//!
//! A finite stepper over category selection, condition selection, and the
//! detail view, driven by a validated [`Catalog`]. State is a tagged union,
//! so an inconsistent combination (a detail view with no condition, a
//! condition without a category) cannot be represented. Progress is
//! ephemeral: dropping the wizard discards it.

use crate::catalog::{Catalog, Category, Condition};
use crate::error::WizardError;

// ============================================================================
// State
// ============================================================================

/// The wizard's current position in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardState<'a> {
    /// Step 1: choosing one of the four categories.
    #[default]
    CategorySelect,
    /// Step 2: choosing a condition within the selected category.
    ConditionSelect {
        /// The category picked in step 1.
        category: Category,
    },
    /// Step 3: viewing one condition's details. No forward transition.
    DetailView {
        /// The category picked in step 1.
        category: Category,
        /// The condition picked in step 2; always a member of `category`'s
        /// list in the backing catalog.
        condition: &'a Condition,
    },
}

/// What the active step displays. Pure derivation of [`WizardState`]; no
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepView<'a> {
    /// Step 1 renders the fixed category list.
    Categories {
        /// All categories, in display order.
        categories: &'a [Category; 4],
    },
    /// Step 2 renders the selected category's conditions (name + severity).
    Conditions {
        /// The selected category.
        category: Category,
        /// Its ordered condition list.
        conditions: &'a [Condition],
    },
    /// Step 3 renders the four detail sections plus the severity badge.
    Details {
        /// The selected condition.
        condition: &'a Condition,
    },
}

// ============================================================================
// Wizard
// ============================================================================

/// The guidance stepper. Borrows a validated catalog for its whole lifetime.
#[derive(Debug)]
pub struct Wizard<'a> {
    catalog: &'a Catalog,
    state: WizardState<'a>,
}

impl<'a> Wizard<'a> {
    /// Creates a wizard at step 1 with nothing selected.
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            state: WizardState::CategorySelect,
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> WizardState<'a> {
        self.state
    }

    /// The current step number (1, 2, or 3). Derived, never stored.
    #[must_use]
    pub const fn step(&self) -> u8 {
        match self.state {
            WizardState::CategorySelect => 1,
            WizardState::ConditionSelect { .. } => 2,
            WizardState::DetailView { .. } => 3,
        }
    }

    /// The selected category, if past step 1.
    #[must_use]
    pub const fn selected_category(&self) -> Option<Category> {
        match self.state {
            WizardState::CategorySelect => None,
            WizardState::ConditionSelect { category }
            | WizardState::DetailView { category, .. } => Some(category),
        }
    }

    /// The selected condition, if at step 3.
    #[must_use]
    pub const fn selected_condition(&self) -> Option<&'a Condition> {
        match self.state {
            WizardState::DetailView { condition, .. } => Some(condition),
            _ => None,
        }
    }

    /// Selects a category and moves to step 2.
    ///
    /// Valid from any state; any previously selected condition is cleared.
    /// `Category` is a closed enum and the catalog is validated, so there is
    /// no failure path.
    pub fn select_category(&mut self, category: Category) {
        self.state = WizardState::ConditionSelect { category };
    }

    /// Selects a condition by name and moves to step 3.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidTransition`] when called outside step 2,
    /// and [`WizardError::UnknownCondition`] when `name` is not in the
    /// selected category's list. Both are caller contract violations: a
    /// correct UI only offers names taken from [`Self::view`].
    pub fn select_condition(&mut self, name: &str) -> Result<(), WizardError> {
        let WizardState::ConditionSelect { category } = self.state else {
            return Err(WizardError::InvalidTransition {
                action: "select_condition",
                step: self.step(),
            });
        };

        let condition = self.catalog.find(category, name).ok_or_else(|| {
            WizardError::UnknownCondition {
                name: name.to_string(),
                category: category.as_str().to_string(),
            }
        })?;

        self.state = WizardState::DetailView {
            category,
            condition,
        };
        Ok(())
    }

    /// Steps backward, clearing the selection made at the step being left.
    ///
    /// A no-op at step 1.
    pub fn back(&mut self) {
        self.state = match self.state {
            WizardState::CategorySelect => WizardState::CategorySelect,
            WizardState::ConditionSelect { .. } => WizardState::CategorySelect,
            WizardState::DetailView { category, .. } => {
                WizardState::ConditionSelect { category }
            }
        };
    }

    /// Returns to step 1 with nothing selected.
    pub fn reset(&mut self) {
        self.state = WizardState::CategorySelect;
    }

    /// Derives the active step's visible content from the current state.
    #[must_use]
    pub fn view(&self) -> StepView<'a> {
        match self.state {
            WizardState::CategorySelect => StepView::Categories {
                categories: &Category::ALL,
            },
            WizardState::ConditionSelect { category } => StepView::Conditions {
                category,
                conditions: self.catalog.conditions(category),
            },
            WizardState::DetailView { condition, .. } => StepView::Details { condition },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
