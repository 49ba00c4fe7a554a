//! Display data for templates.
//!
//! Handlers turn domain values into these flat, pre-formatted views so the
//! templates only print strings and test booleans.

use muva_core::{BookingState, ContactStatus, ContactSubmitter, FilterCriteria, Product, Settings};
use url::form_urlencoded;

/// Shown instead of the booking frame when no booking link is configured.
pub const BOOKING_PLACEHOLDER: &str =
    "Online booking isn't set up yet. Add a calendlyUrl to settings.json to enable it.";

/// Shown instead of the contact form when no form id is configured.
pub const CONTACT_DISABLED_NOTICE: &str =
    "The contact form isn't set up yet. Add a formspreeId to settings.json to enable it.";

/// Stock line for a product with `available` in-stock sizes.
#[must_use]
pub fn stock_label(available: usize) -> String {
    match available {
        0 => "No restock – join waitlist via booking".to_string(),
        1 => "1 size in stock".to_string(),
        n => format!("{n} sizes in stock"),
    }
}

/// Link back to the catalog page keeping `criteria`.
///
/// `book` adds the booking parameter: `Some("")` opens the generic dialog,
/// `Some(id)` opens it for a product.
#[must_use]
pub fn catalog_href(criteria: &FilterCriteria, book: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if !criteria.query.is_empty() {
        query.append_pair("q", &criteria.query);
    }
    if !criteria.size.is_empty() {
        query.append_pair("size", &criteria.size);
    }
    if !criteria.color.is_empty() {
        query.append_pair("color", &criteria.color);
    }
    if let Some(book) = book {
        query.append_pair("book", book);
    }

    let query = query.finish();
    if query.is_empty() {
        "/#catalog".to_string()
    } else {
        format!("/?{query}#catalog")
    }
}

/// A size chip on a product card.
#[derive(Clone)]
pub struct SizeChipView {
    pub label: String,
    pub sold_out: bool,
}

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<SizeChipView>,
    pub in_stock: bool,
    pub stock_label: String,
    /// Opens the booking dialog for this product.
    pub book_href: String,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, criteria: &FilterCriteria) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            colors: product.colors.clone(),
            sizes: product
                .sizes
                .iter()
                .map(|s| SizeChipView {
                    label: s.label.clone(),
                    sold_out: !s.is_available(),
                })
                .collect(),
            in_stock: product.in_stock(),
            stock_label: stock_label(product.available_sizes().count()),
            book_href: catalog_href(criteria, Some(product.id.as_str())),
        }
    }
}

/// An option in a facet `<select>`.
#[derive(Clone)]
pub struct FacetOption {
    pub value: String,
    pub selected: bool,
}

impl FacetOption {
    /// Options for `values`, marking the one equal to `current`.
    #[must_use]
    pub fn list(values: &[String], current: &str) -> Vec<Self> {
        values
            .iter()
            .map(|value| Self {
                value: value.clone(),
                selected: value == current,
            })
            .collect()
    }
}

/// The open booking dialog.
#[derive(Clone)]
pub struct BookingView {
    /// Name of the product being booked, for the "for: ..." line.
    pub product_name: Option<String>,
    /// Frame source; `None` renders [`BOOKING_PLACEHOLDER`].
    pub calendly_url: Option<String>,
    pub placeholder: &'static str,
    pub close_href: String,
}

impl BookingView {
    /// View for `state`, or `None` when the dialog is closed.
    #[must_use]
    pub fn new(state: &BookingState, settings: &Settings, close_href: String) -> Option<Self> {
        match state {
            BookingState::Closed => None,
            BookingState::Open(product) => Some(Self::open(product.as_ref(), settings, close_href)),
        }
    }

    /// View for a dialog open for `product` (or generic when `None`).
    #[must_use]
    pub fn open(product: Option<&Product>, settings: &Settings, close_href: String) -> Self {
        Self {
            product_name: product.map(|p| p.name.clone()),
            calendly_url: settings.booking_url().map(str::to_owned),
            placeholder: BOOKING_PLACEHOLDER,
            close_href,
        }
    }
}

/// The contact section.
#[derive(Clone, Default)]
pub struct ContactView {
    pub status: &'static str,
    pub name: String,
    pub email: String,
    pub message: String,
    pub disabled: bool,
    pub submitting: bool,
    pub success: bool,
    pub error: bool,
    /// Inline validation message for an idle form.
    pub validation: Option<String>,
    pub disabled_notice: &'static str,
}

impl ContactView {
    #[must_use]
    pub fn new(submitter: &ContactSubmitter, validation: Option<String>) -> Self {
        let status = submitter.status();
        let form = submitter.form();
        Self {
            status: status.as_str(),
            name: form.name.clone(),
            email: form.email.clone(),
            message: form.message.clone(),
            disabled: !submitter.is_enabled(),
            submitting: status == ContactStatus::Submitting,
            success: status == ContactStatus::Success,
            error: status == ContactStatus::Error,
            validation,
            disabled_notice: CONTACT_DISABLED_NOTICE,
        }
    }
}
