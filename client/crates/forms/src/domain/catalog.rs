//! Catalog Validators
//!
//! Composite validators for the product listing and blog article forms.
//! Each returns the first violated rule per field.

use kernel::FieldErrors;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::rules::parse_number;
use super::{FormValues, field};

// ============================================================================
// Constants
// ============================================================================

pub const PRODUCT_NAME_MAX_LENGTH: usize = 100;
pub const PRODUCT_DESCRIPTION_MAX_LENGTH: usize = 300;
pub const PRODUCT_MIN_STOCK: u32 = 1;

pub const ARTICLE_TITLE_MIN_LENGTH: usize = 5;
pub const ARTICLE_TITLE_MAX_LENGTH: usize = 150;
pub const ARTICLE_DESCRIPTION_MAX_LENGTH: usize = 300;
pub const ARTICLE_CONTENT_MIN_LENGTH: usize = 20;

// ============================================================================
// Enumerations
// ============================================================================

/// Implements `code()`, `ALL`, `FromStr` and `Display` for a field choice enum
macro_rules! choice_enum {
    ($name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[inline]
            pub const fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Game,
    Accessories,
    Merchandising,
    Other,
}

choice_enum!(ProductCategory {
    Game => "juego",
    Accessories => "accesorios",
    Merchandising => "merchandising",
    Other => "otros",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCondition {
    New,
    LikeNew,
    Good,
    Acceptable,
}

choice_enum!(ProductCondition {
    New => "nuevo",
    LikeNew => "como_nuevo",
    Good => "bueno",
    Acceptable => "aceptable",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleCategory {
    Review,
    Analysis,
    News,
    Guide,
    Opinion,
}

choice_enum!(ArticleCategory {
    Review => "reseña",
    Analysis => "analisis",
    News => "noticia",
    Guide => "guia",
    Opinion => "opinion",
});

// ============================================================================
// Product
// ============================================================================

/// Fields: `name`, `description`, `price`, `stock`, `category`, `condition`
pub fn validate_product(values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let name = field(values, "name");
    if name.is_empty() {
        errors.insert_first("name", "Product name is required");
    } else if name.chars().count() > PRODUCT_NAME_MAX_LENGTH {
        errors.insert_first("name", "Product name cannot be longer than 100 characters");
    }

    let description = field(values, "description");
    if description.is_empty() {
        errors.insert_first("description", "Description is required");
    } else if description.chars().count() > PRODUCT_DESCRIPTION_MAX_LENGTH {
        errors.insert_first(
            "description",
            "Description cannot be longer than 300 characters",
        );
    }

    let price = field(values, "price");
    if price.is_empty() {
        errors.insert_first("price", "Price is required");
    } else {
        match parse_number(price) {
            None => errors.insert_first("price", "Price must be a number"),
            Some(p) if p < 0.0 => errors.insert_first("price", "Price cannot be negative"),
            Some(_) => {}
        }
    }

    let stock = field(values, "stock");
    if stock.is_empty() {
        errors.insert_first("stock", "Stock is required");
    } else {
        match stock.parse::<u32>() {
            Err(_) => errors.insert_first("stock", "Stock must be a whole number"),
            Ok(s) if s < PRODUCT_MIN_STOCK => {
                errors.insert_first("stock", "Stock must be at least 1")
            }
            Ok(_) => {}
        }
    }

    if field(values, "category").parse::<ProductCategory>().is_err() {
        errors.insert_first("category", "Select a valid category");
    }
    if field(values, "condition").parse::<ProductCondition>().is_err() {
        errors.insert_first("condition", "Select the product condition");
    }

    errors
}

// ============================================================================
// Article
// ============================================================================

/// Fields: `title`, `description`, `content`, `category`
pub fn validate_article(values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let title = field(values, "title");
    let title_length = title.chars().count();
    if title.is_empty() {
        errors.insert_first("title", "Title is required");
    } else if title_length < ARTICLE_TITLE_MIN_LENGTH {
        errors.insert_first("title", "Title must be at least 5 characters");
    } else if title_length > ARTICLE_TITLE_MAX_LENGTH {
        errors.insert_first("title", "Title cannot be longer than 150 characters");
    }

    let description = field(values, "description");
    if description.is_empty() {
        errors.insert_first("description", "Description is required");
    } else if description.chars().count() > ARTICLE_DESCRIPTION_MAX_LENGTH {
        errors.insert_first(
            "description",
            "Description cannot be longer than 300 characters",
        );
    }

    let content = field(values, "content");
    if content.is_empty() {
        errors.insert_first("content", "Content is required");
    } else if content.chars().count() < ARTICLE_CONTENT_MIN_LENGTH {
        errors.insert_first("content", "Content must be at least 20 characters");
    }

    if field(values, "category").parse::<ArticleCategory>().is_err() {
        errors.insert_first("category", "Select a valid category");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn valid_product() -> FormValues {
        values(&[
            ("name", "The Legend of Zelda: Breath of the Wild"),
            ("description", "Switch cartridge, complete in box"),
            ("price", "39.95"),
            ("stock", "1"),
            ("category", "juego"),
            ("condition", "como_nuevo"),
        ])
    }

    #[test]
    fn test_valid_product() {
        assert!(validate_product(&valid_product()).is_valid());
    }

    #[test]
    fn test_product_required_fields() {
        let errors = validate_product(&FormValues::new());
        for field in ["name", "description", "price", "stock", "category", "condition"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert_eq!(errors.get("price"), Some("Price is required"));
    }

    #[test]
    fn test_product_lengths() {
        let mut v = valid_product();
        v.insert("name".into(), "x".repeat(101));
        v.insert("description".into(), "x".repeat(301));
        let errors = validate_product(&v);
        assert_eq!(
            errors.get("name"),
            Some("Product name cannot be longer than 100 characters")
        );
        assert!(errors.contains("description"));

        v.insert("name".into(), "x".repeat(100));
        v.insert("description".into(), "x".repeat(300));
        assert!(validate_product(&v).is_valid());
    }

    #[test]
    fn test_product_numbers() {
        let mut v = valid_product();
        v.insert("price".into(), "-1".into());
        v.insert("stock".into(), "0".into());
        let errors = validate_product(&v);
        assert_eq!(errors.get("price"), Some("Price cannot be negative"));
        assert_eq!(errors.get("stock"), Some("Stock must be at least 1"));

        v.insert("price".into(), "gratis".into());
        v.insert("stock".into(), "1.5".into());
        let errors = validate_product(&v);
        assert_eq!(errors.get("price"), Some("Price must be a number"));
        assert_eq!(errors.get("stock"), Some("Stock must be a whole number"));

        v.insert("price".into(), "0".into());
        v.insert("stock".into(), "3".into());
        assert!(validate_product(&v).is_valid());
    }

    #[test]
    fn test_product_choices() {
        let mut v = valid_product();
        v.insert("category".into(), "consolas".into());
        v.insert("condition".into(), "roto".into());
        let errors = validate_product(&v);
        assert!(errors.contains("category"));
        assert!(errors.contains("condition"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_article() {
        let ok = values(&[
            ("title", "Análisis: Hollow Knight"),
            ("description", "Un metroidvania imprescindible"),
            ("content", "Hollow Knight es un juego de acción y exploración..."),
            ("category", "analisis"),
        ]);
        assert!(validate_article(&ok).is_valid());

        let bad = values(&[("title", "Hey"), ("content", "corto"), ("category", "meme")]);
        let errors = validate_article(&bad);
        assert_eq!(errors.get("title"), Some("Title must be at least 5 characters"));
        assert_eq!(errors.get("description"), Some("Description is required"));
        assert_eq!(errors.get("content"), Some("Content must be at least 20 characters"));
        assert_eq!(errors.get("category"), Some("Select a valid category"));
    }

    #[test]
    fn test_choice_codes() {
        assert_eq!(ArticleCategory::Review.code(), "reseña");
        assert_eq!("reseña".parse::<ArticleCategory>(), Ok(ArticleCategory::Review));
        assert_eq!(ProductCategory::ALL.len(), 4);
        assert_eq!(ProductCondition::LikeNew.to_string(), "como_nuevo");
    }
}
