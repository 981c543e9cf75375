use anyhow::{bail, Context};
use chrono::Local;
use hotdeal_core::catalog::{resolve_choice, Catalog};
use hotdeal_core::domain::deal::{DealId, DealUpdate, EventPeriod, NewDeal};
use hotdeal_core::pricing::discount::{DiscountLineItem, DiscountSchedule, DiscountSlot};
use hotdeal_core::pricing::money::{format_won, parse_amount};
use hotdeal_core::search::{distinct_platforms, search_deals, DealQuery, SortKey, SortOrder};
use hotdeal_db::{DealRepository, SqlDealRepository};
use serde_json::json;

use crate::commands::{
    application_error, authorize, execute, open_store, repository_error, to_json, CommandError,
    CommandResult,
};

#[derive(Debug, Clone, Default, clap::Args)]
pub struct AddDealArgs {
    #[arg(long, help = "Admin password")]
    pub password: String,
    #[arg(long, help = "Catalog category, e.g. 디지털/가전")]
    pub category: String,
    #[arg(long, help = "Platform picked from the default list")]
    pub platform: Option<String>,
    #[arg(long, help = "Free-text platform; overrides --platform when not blank")]
    pub platform_text: Option<String>,
    #[arg(long, help = "Representative brand of the category")]
    pub brand: Option<String>,
    #[arg(long, help = "Free-text brand; overrides --brand when not blank")]
    pub brand_text: Option<String>,
    #[arg(long, help = "Product name as listed")]
    pub product: String,
    #[arg(long, help = "Standard model name; defaults to the product name")]
    pub model: Option<String>,
    #[arg(long, help = "Normal (list) price")]
    pub normal_price: String,
    #[arg(long, help = "Coupon discount, `10%` or `5000`")]
    pub coupon: Option<String>,
    #[arg(long, help = "Card discount, `10%` or `5000`")]
    pub card: Option<String>,
    #[arg(long, help = "Additional discount, `10%` or `5000`")]
    pub extra_1: Option<String>,
    #[arg(long, help = "Additional discount, `10%` or `5000`")]
    pub extra_2: Option<String>,
    #[arg(long, help = "Perceived price including gifts")]
    pub perceived_price: Option<String>,
    #[arg(long, help = "Event period `YYYY-MM-DD ~ YYYY-MM-DD` or a single day")]
    pub period: String,
    #[arg(long, default_value = "", help = "Gift composition")]
    pub gift: String,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct SearchDealArgs {
    #[arg(long, default_value = "", help = "Brand, product, or model name fragment")]
    pub term: String,
    #[arg(long, default_value = "all", help = "Exact platform, or `all`")]
    pub platform: String,
    #[arg(long, default_value = "event_start", help = "event_start | final_price")]
    pub sort: String,
    #[arg(long, default_value = "desc", help = "asc | desc")]
    pub order: String,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct UpdateDealArgs {
    #[arg(long, help = "Admin password")]
    pub password: String,
    #[arg(long, help = "Deal id")]
    pub id: String,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub platform: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub product: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub normal_price: Option<String>,
    #[arg(long)]
    pub final_price: Option<String>,
    #[arg(long)]
    pub perceived_price: Option<String>,
    #[arg(long)]
    pub period: Option<String>,
    #[arg(long)]
    pub gift: Option<String>,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct DeleteDealArgs {
    #[arg(long, help = "Admin password")]
    pub password: String,
    #[arg(long, help = "Deal id")]
    pub id: String,
}

pub fn add(args: AddDealArgs) -> CommandResult {
    execute("deal.add", |config, runtime| {
        let _session = authorize(config, &args.password)?;
        let draft = build_new_deal(&args, &Catalog::default())
            .map_err(|error| ("validation", format!("{error:#}"), 2u8))?;

        let breakdown = draft.price_breakdown();
        let deal = draft
            .into_deal(DealId::generate(), Local::now().date_naive())
            .map_err(application_error)?;
        if breakdown.is_over_discounted() {
            tracing::warn!(
                event_name = "system.deal.over_discounted",
                deal_id = %deal.id.0,
                final_price = %deal.final_price,
                "discounts exceed the normal price"
            );
        }

        runtime.block_on(async {
            let pool = open_store(config).await?;
            let saved = SqlDealRepository::new(pool.clone())
                .save(deal.clone())
                .await
                .map_err(repository_error);
            pool.close().await;
            saved
        })?;
        tracing::info!(
            event_name = "system.deal.registered",
            deal_id = %deal.id.0,
            "deal registered"
        );

        Ok(CommandResult::success_with_data(
            "deal.add",
            format!("registered `{}` at {}", deal.product_name, format_won(deal.final_price)),
            json!({
                "deal": to_json(&deal)?,
                "trace": to_json(&breakdown.trace())?,
                "over_discounted": breakdown.is_over_discounted(),
            }),
        ))
    })
}

pub fn search(args: SearchDealArgs) -> CommandResult {
    execute("deal.search", |config, runtime| {
        let query = DealQuery {
            term: args.term.clone(),
            platform: args.platform.clone(),
            sort_key: args.sort.parse::<SortKey>().map_err(application_error)?,
            sort_order: args.order.parse::<SortOrder>().map_err(application_error)?,
        };
        if !query.is_active() {
            return Ok(CommandResult::success(
                "deal.search",
                "enter a search term or pick a platform to search",
            ));
        }

        let deals = load_deals(config, runtime)?;
        let Some(outcome) = search_deals(&deals, &query) else {
            return Ok(CommandResult::success("deal.search", "search is inactive"));
        };

        let message = match (outcome.min_final_price, outcome.min_perceived_price) {
            (Some(min_final), Some(min_perceived)) => format!(
                "{} match(es); lowest final {}, lowest perceived {}",
                outcome.deals.len(),
                format_won(min_final),
                format_won(min_perceived)
            ),
            _ => "no matching deals".to_string(),
        };
        Ok(CommandResult::success_with_data("deal.search", message, to_json(&outcome)?))
    })
}

pub fn list() -> CommandResult {
    execute("deal.list", |config, runtime| {
        let deals = load_deals(config, runtime)?;
        let platforms = distinct_platforms(&deals);

        Ok(CommandResult::success_with_data(
            "deal.list",
            format!("{} deal(s) on {} platform(s)", deals.len(), platforms.len()),
            json!({ "platforms": platforms, "deals": to_json(&deals)? }),
        ))
    })
}

pub fn update(args: UpdateDealArgs) -> CommandResult {
    execute("deal.update", |config, runtime| {
        let _session = authorize(config, &args.password)?;
        let changes = build_update(&args, &Catalog::default())
            .map_err(|error| ("validation", format!("{error:#}"), 2u8))?;
        let id = DealId(args.id.clone());

        let deal = runtime.block_on(async {
            let pool = open_store(config).await?;
            let repo = SqlDealRepository::new(pool.clone());
            let result = async {
                let mut deal = repo
                    .find_by_id(&id)
                    .await
                    .map_err(repository_error)?
                    .ok_or_else(|| {
                        ("not_found", format!("deal `{}` was not found", id.0), 2u8)
                    })?;
                deal.apply_update(changes).map_err(application_error)?;
                repo.save(deal.clone()).await.map_err(repository_error)?;
                Ok::<_, CommandError>(deal)
            }
            .await;
            pool.close().await;
            result
        })?;
        tracing::info!(
            event_name = "system.deal.updated",
            deal_id = %deal.id.0,
            "deal updated"
        );

        Ok(CommandResult::success_with_data(
            "deal.update",
            format!("updated `{}`", deal.product_name),
            to_json(&deal)?,
        ))
    })
}

pub fn delete(args: DeleteDealArgs) -> CommandResult {
    execute("deal.delete", |config, runtime| {
        let _session = authorize(config, &args.password)?;
        let id = DealId(args.id.clone());

        runtime.block_on(async {
            let pool = open_store(config).await?;
            let deleted =
                SqlDealRepository::new(pool.clone()).delete(&id).await.map_err(repository_error);
            pool.close().await;
            deleted
        })?;
        tracing::info!(event_name = "system.deal.deleted", deal_id = %id.0, "deal deleted");

        Ok(CommandResult::success("deal.delete", format!("deleted deal `{}`", id.0)))
    })
}

fn load_deals(
    config: &hotdeal_core::config::AppConfig,
    runtime: &tokio::runtime::Runtime,
) -> Result<Vec<hotdeal_core::domain::deal::HotDeal>, CommandError> {
    runtime.block_on(async {
        let pool = open_store(config).await?;
        let deals = SqlDealRepository::new(pool.clone()).list().await.map_err(repository_error);
        pool.close().await;
        deals
    })
}

fn ensure_known_category(catalog: &Catalog, category: &str) -> anyhow::Result<()> {
    if catalog.find(category).is_none() {
        bail!(
            "unknown category `{category}` (expected one of: {})",
            catalog.category_names().join(", ")
        );
    }
    Ok(())
}

fn build_new_deal(args: &AddDealArgs, catalog: &Catalog) -> anyhow::Result<NewDeal> {
    ensure_known_category(catalog, &args.category)?;

    let platform =
        resolve_choice(args.platform.as_deref().unwrap_or_default(), args.platform_text.as_deref());
    if platform.is_empty() {
        bail!("a platform is required (--platform or --platform-text)");
    }
    let brand =
        resolve_choice(args.brand.as_deref().unwrap_or_default(), args.brand_text.as_deref());

    let mut discounts = DiscountSchedule::default();
    let slots = [
        (DiscountSlot::Coupon, &args.coupon),
        (DiscountSlot::Card, &args.card),
        (DiscountSlot::Extra1, &args.extra_1),
        (DiscountSlot::Extra2, &args.extra_2),
    ];
    for (slot, raw) in slots {
        if let Some(raw) = raw.as_deref() {
            discounts.set(slot, parse_discount(raw));
        }
    }

    let event_period = EventPeriod::parse(&args.period)
        .with_context(|| format!("invalid --period `{}`", args.period))?;

    Ok(NewDeal {
        category: args.category.trim().to_string(),
        platform: platform.to_string(),
        brand: brand.to_string(),
        product_name: args.product.clone(),
        standard_model_name: args.model.clone(),
        normal_price: parse_amount(args.normal_price.as_str()),
        discounts,
        perceived_price: parse_amount(args.perceived_price.as_deref()),
        event_period,
        gift: args.gift.clone(),
    })
}

fn build_update(args: &UpdateDealArgs, catalog: &Catalog) -> anyhow::Result<DealUpdate> {
    if let Some(category) = args.category.as_deref() {
        ensure_known_category(catalog, category)?;
    }
    let event_period = args
        .period
        .as_deref()
        .map(EventPeriod::parse)
        .transpose()
        .context("invalid --period")?;

    let update = DealUpdate {
        category: args.category.clone(),
        platform: args.platform.clone(),
        brand: args.brand.clone(),
        product_name: args.product.clone(),
        standard_model_name: args.model.clone(),
        normal_price: args.normal_price.as_deref().map(|raw| parse_amount(raw)),
        final_price: args.final_price.as_deref().map(|raw| parse_amount(raw)),
        perceived_price: args.perceived_price.as_deref().map(|raw| parse_amount(raw)),
        event_period,
        gift: args.gift.clone(),
    };
    if update.is_empty() {
        bail!("nothing to update; pass at least one field flag");
    }
    Ok(update)
}

/// `"10%"` is a percentage of the normal price; anything else is a flat won amount.
fn parse_discount(raw: &str) -> DiscountLineItem {
    let value = parse_amount(raw);
    if raw.trim_end().ends_with('%') {
        DiscountLineItem::percent(value)
    } else {
        DiscountLineItem::flat(value)
    }
}

#[cfg(test)]
mod tests {
    use hotdeal_core::catalog::Catalog;
    use hotdeal_core::pricing::discount::DiscountUnit;
    use rust_decimal::Decimal;

    use super::{build_new_deal, build_update, parse_discount, AddDealArgs, UpdateDealArgs};

    fn args() -> AddDealArgs {
        AddDealArgs {
            password: "pw".to_string(),
            category: "디지털/가전".to_string(),
            platform: Some("쿠팡".to_string()),
            platform_text: Some("  ".to_string()),
            brand: Some("삼성전자".to_string()),
            brand_text: None,
            product: "갤럭시 버즈3 프로".to_string(),
            normal_price: "259,000원".to_string(),
            coupon: Some("10%".to_string()),
            card: Some("5,000".to_string()),
            period: "2025-11-01 ~ 2025-11-11".to_string(),
            ..AddDealArgs::default()
        }
    }

    #[test]
    fn discount_suffix_selects_unit() {
        assert_eq!(parse_discount("10%").unit, DiscountUnit::Percent);
        assert_eq!(parse_discount("5,000원").unit, DiscountUnit::Flat);
        assert_eq!(parse_discount("5,000").value, Decimal::from(5_000));
    }

    #[test]
    fn new_deal_assembles_from_flags() {
        let draft = build_new_deal(&args(), &Catalog::default()).expect("valid args");

        assert_eq!(draft.platform, "쿠팡");
        assert_eq!(draft.normal_price, Decimal::from(259_000));
        assert_eq!(draft.price_breakdown().final_price(), Decimal::from(228_100));
    }

    #[test]
    fn free_text_platform_wins() {
        let mut args = args();
        args.platform_text = Some("티몬".to_string());

        let draft = build_new_deal(&args, &Catalog::default()).expect("valid args");
        assert_eq!(draft.platform, "티몬");
    }

    #[test]
    fn unknown_category_and_bad_period_are_rejected() {
        let mut unknown = args();
        unknown.category = "자동차".to_string();
        assert!(build_new_deal(&unknown, &Catalog::default()).is_err());

        let mut bad_period = args();
        bad_period.period = "soon".to_string();
        let error = build_new_deal(&bad_period, &Catalog::default()).expect_err("bad period");
        assert!(format!("{error:#}").contains("invalid --period"));
    }

    #[test]
    fn empty_update_is_rejected() {
        let args = UpdateDealArgs { id: "D-1".to_string(), ..UpdateDealArgs::default() };
        assert!(build_update(&args, &Catalog::default()).is_err());

        let args = UpdateDealArgs {
            id: "D-1".to_string(),
            final_price: Some("199,000원".to_string()),
            ..UpdateDealArgs::default()
        };
        let update = build_update(&args, &Catalog::default()).expect("update");
        assert_eq!(update.final_price, Some(Decimal::from(199_000)));
    }

    #[test]
    fn largest_accepted_price_prices_without_overflow() {
        let mut huge = args();
        huge.normal_price = "79,228,162,514,264,337,593,543,950,335원".to_string();
        huge.coupon = Some("50%".to_string());

        let draft = build_new_deal(&huge, &Catalog::default()).expect("valid args");
        let final_price = draft.price_breakdown().final_price();
        assert!(final_price > Decimal::ZERO && final_price < Decimal::MAX);
    }

    #[test]
    fn update_rejects_category_outside_catalog() {
        let unknown = UpdateDealArgs {
            id: "D-1".to_string(),
            category: Some("자동차".to_string()),
            ..UpdateDealArgs::default()
        };
        let error = build_update(&unknown, &Catalog::default()).expect_err("unknown category");
        assert!(format!("{error:#}").contains("unknown category `자동차`"));

        let known = UpdateDealArgs { category: Some("가공식품".to_string()), ..unknown };
        let update = build_update(&known, &Catalog::default()).expect("known category");
        assert_eq!(update.category.as_deref(), Some("가공식품"));
    }
}
