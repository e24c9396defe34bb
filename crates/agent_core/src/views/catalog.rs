//! Stateless grid/list renderers for brands, categories, offers and products.

use std::fmt::Write as _;

use shared::{
    domain::{Environment, MinorUnits},
    protocol::{Brand, Category, Offer, Product},
};
use url::Url;

use super::{empty_state, html_escape};
use crate::error::AgentError;

const DEFAULT_CATEGORY_ICON: &str = "tag";

/// Static icon lookup by category display name.
pub fn category_icon(name: &str) -> &'static str {
    match name.trim().to_ascii_lowercase().as_str() {
        "food" | "dining" | "restaurants" | "food & drink" => "utensils",
        "travel" | "flights" | "hotels" => "plane",
        "fashion" | "apparel" | "clothing" => "shirt",
        "electronics" | "tech" | "gadgets" => "laptop",
        "groceries" | "grocery" => "basket",
        "entertainment" | "movies" | "gaming" => "ticket",
        "health" | "beauty" | "wellness" => "heart",
        "home" | "home & garden" => "home",
        "sports" | "fitness" => "dumbbell",
        _ => DEFAULT_CATEGORY_ICON,
    }
}

/// Builds offer links against the environment's base URL, carrying the host
/// callback as a query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferLinks {
    base: Url,
    callback: Url,
    partner_id: String,
    locale: String,
}

impl OfferLinks {
    pub fn new(
        environment: Environment,
        callback_url: &str,
        partner_id: impl Into<String>,
        locale: impl Into<String>,
    ) -> Result<Self, AgentError> {
        let base = Url::parse(environment.base_url())
            .map_err(|err| AgentError::Config(format!("bad base url for {environment:?}: {err}")))?;
        let callback = Url::parse(callback_url)
            .map_err(|err| AgentError::Config(format!("callback_url '{callback_url}': {err}")))?;
        Ok(Self {
            base,
            callback,
            partner_id: partner_id.into(),
            locale: locale.into(),
        })
    }

    pub fn offer_url(&self, offer: &Offer) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("offers")
                .push(offer.offer_id.as_str());
        }
        url.query_pairs_mut()
            .append_pair("partner", &self.partner_id)
            .append_pair("lang", &self.locale)
            .append_pair("callback", self.callback.as_str());
        url
    }
}

pub struct BrandListView;

impl BrandListView {
    pub fn render(brands: &[Brand]) -> String {
        let mut out = String::from(r#"<section class="me-agent-brands"><ul class="me-agent-grid">"#);
        if brands.is_empty() {
            out.push_str("</ul>");
            empty_state(&mut out, "No brands available yet.");
            out.push_str("</section>");
            return out;
        }
        for brand in brands {
            let _ = write!(
                out,
                r#"<li class="me-agent-card" data-me-brand="{}">"#,
                html_escape(brand.brand_id.as_str())
            );
            if let Some(logo) = &brand.logo_url {
                let _ = write!(
                    out,
                    r#"<img class="me-agent-logo" src="{}" alt="{}">"#,
                    html_escape(logo),
                    html_escape(&brand.name)
                );
            }
            let _ = write!(out, "<h4>{}</h4>", html_escape(&brand.name));
            if let Some(description) = &brand.description {
                let _ = write!(out, "<p>{}</p>", html_escape(description));
            }
            let noun = if brand.offer_count == 1 { "offer" } else { "offers" };
            let _ = write!(
                out,
                r#"<span class="me-agent-count">{} {noun}</span></li>"#,
                brand.offer_count
            );
        }
        out.push_str("</ul></section>");
        out
    }
}

pub struct CategoryListView;

impl CategoryListView {
    pub fn render(categories: &[Category]) -> String {
        let mut out =
            String::from(r#"<section class="me-agent-categories"><ul class="me-agent-list">"#);
        if categories.is_empty() {
            out.push_str("</ul>");
            empty_state(&mut out, "No categories available yet.");
            out.push_str("</section>");
            return out;
        }
        for category in categories {
            let _ = write!(
                out,
                r#"<li class="me-agent-category" data-me-category="{}"><i class="me-icon me-icon-{}"></i><span>{}</span></li>"#,
                html_escape(category.category_id.as_str()),
                category_icon(&category.name),
                html_escape(&category.name)
            );
        }
        out.push_str("</ul></section>");
        out
    }
}

pub struct OfferListView;

impl OfferListView {
    pub fn render(offers: &[Offer], links: &OfferLinks) -> String {
        let mut out = String::from(r#"<section class="me-agent-offers"><ul class="me-agent-grid">"#);
        if offers.is_empty() {
            out.push_str("</ul>");
            empty_state(&mut out, "No offers right now. Check back soon.");
            out.push_str("</section>");
            return out;
        }
        for offer in offers {
            let _ = write!(
                out,
                r#"<li class="me-agent-card" data-me-offer="{}"><a href="{}">"#,
                html_escape(offer.offer_id.as_str()),
                html_escape(links.offer_url(offer).as_str())
            );
            if let Some(image) = &offer.image_url {
                let _ = write!(
                    out,
                    r#"<img src="{}" alt="{}">"#,
                    html_escape(image),
                    html_escape(&offer.title)
                );
            }
            let _ = write!(
                out,
                r#"<h4>{}</h4><p class="me-agent-brand">{}</p><p>{}</p></a></li>"#,
                html_escape(&offer.title),
                html_escape(&offer.brand_name),
                html_escape(&offer.description)
            );
        }
        out.push_str("</ul></section>");
        out
    }
}

pub struct ProductListView;

impl ProductListView {
    pub fn render(products: &[Product]) -> String {
        let mut out =
            String::from(r#"<section class="me-agent-products"><ul class="me-agent-grid">"#);
        if products.is_empty() {
            out.push_str("</ul>");
            empty_state(&mut out, "No products available yet.");
            out.push_str("</section>");
            return out;
        }
        for product in products {
            let _ = write!(
                out,
                r#"<li class="me-agent-card" data-me-product="{}">"#,
                html_escape(product.product_id.as_str())
            );
            if let Some(image) = product.images.first() {
                let _ = write!(
                    out,
                    r#"<img src="{}" alt="{}">"#,
                    html_escape(image),
                    html_escape(&product.name)
                );
            }
            let _ = write!(out, "<h4>{}</h4>", html_escape(&product.name));
            let currency = html_escape(&product.currency);
            let price = MinorUnits::new(product.price, product.decimals);
            let effective = product.effective_price();
            if effective < product.price {
                let _ = write!(
                    out,
                    r#"<p class="me-agent-price"><s>{price} {currency}</s> <strong>{} {currency}</strong></p>"#,
                    MinorUnits::new(effective, product.decimals)
                );
            } else {
                let _ = write!(
                    out,
                    r#"<p class="me-agent-price"><strong>{price} {currency}</strong></p>"#
                );
            }
            out.push_str("</li>");
        }
        out.push_str("</ul></section>");
        out
    }
}
