use crate::error::{FieldError, ValidationErrors};
use crate::models::NewListing;
use once_cell::sync::Lazy;
use regex::Regex;

const TITLE_MAX: usize = 255;
const CATEGORY_MAX: usize = 100;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

/// Check a submitted listing, collecting every failing field
pub fn validate(listing: &NewListing) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    let title_len = listing.title.chars().count();
    if title_len == 0 {
        errors.push(FieldError::new("title", "Title is required."));
    } else if title_len > TITLE_MAX {
        errors.push(FieldError::new(
            "title",
            "Title must be 255 characters or fewer.",
        ));
    }

    if !listing.price.is_finite() {
        errors.push(FieldError::new("price", "Price must be a number."));
    } else if listing.price < 0.0 {
        errors.push(FieldError::new("price", "Price must be a positive number."));
    }

    let category_len = listing.category.chars().count();
    if category_len == 0 {
        errors.push(FieldError::new("category", "Category is required."));
    } else if category_len > CATEGORY_MAX {
        errors.push(FieldError::new(
            "category",
            "Category must be 100 characters or fewer.",
        ));
    }

    if !EMAIL.is_match(&listing.seller_email) {
        errors.push(FieldError::new("seller_email", "Must be a valid email."));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewListing {
        NewListing {
            title: "Desk lamp".to_string(),
            description: "Barely used".to_string(),
            price: 25.0,
            category: "furniture".to_string(),
            seller_email: "seller@example.com".to_string(),
            location: None,
        }
    }

    #[test]
    fn accepts_complete_listing() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn free_items_are_allowed() {
        let listing = NewListing {
            price: 0.0,
            ..valid()
        };
        assert!(validate(&listing).is_ok());
    }

    #[test]
    fn reports_every_failing_field() {
        let listing = NewListing {
            title: String::new(),
            price: -1.0,
            category: String::new(),
            seller_email: "not-an-email".to_string(),
            ..valid()
        };
        let errors = validate(&listing).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["title", "price", "category", "seller_email"]);
        assert_eq!(errors.0[0].message, "Title is required.");
    }

    #[test]
    fn enforces_length_limits() {
        let listing = NewListing {
            title: "x".repeat(256),
            category: "y".repeat(101),
            ..valid()
        };
        let errors = validate(&listing).unwrap_err();
        assert_eq!(errors.0.len(), 2);
        assert_eq!(errors.0[0].message, "Title must be 255 characters or fewer.");

        let at_limit = NewListing {
            title: "x".repeat(255),
            category: "y".repeat(100),
            ..valid()
        };
        assert!(validate(&at_limit).is_ok());
    }

    #[test]
    fn rejects_nan_price() {
        let listing = NewListing {
            price: f64::NAN,
            ..valid()
        };
        let errors = validate(&listing).unwrap_err();
        assert_eq!(errors.0[0].field, "price");
    }

    #[test]
    fn email_shapes() {
        for good in ["a@b.co", "first.last+tag@mail.example.org"] {
            let listing = NewListing {
                seller_email: good.to_string(),
                ..valid()
            };
            assert!(validate(&listing).is_ok(), "{good}");
        }
        for bad in ["", "a@", "@b.co", "a b@c.com", "a@b"] {
            let listing = NewListing {
                seller_email: bad.to_string(),
                ..valid()
            };
            assert!(validate(&listing).is_err(), "{bad}");
        }
    }
}
