use chrono::{Duration, TimeZone, Utc};
use crypto_tracker_core::models::cache::CoinCache;
use crypto_tracker_core::models::coin::{Coin, CoinDetails, PriceHistory};
use crypto_tracker_core::models::favorites::Favorites;
use crypto_tracker_core::models::holding::Holding;
use crypto_tracker_core::models::portfolio::{Portfolio, PortfolioStats};
use crypto_tracker_core::models::query::{CoinQuery, SortKey, TrendFilter};
use crypto_tracker_core::models::settings::{Settings, MAX_PER_PAGE};

fn bitcoin() -> Coin {
    Coin {
        current_price: 40_000.0,
        image: "https://img/btc.png".into(),
        ..Coin::new("bitcoin", "btc", "Bitcoin")
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Coin
// ═══════════════════════════════════════════════════════════════════

mod coin {
    use super::*;

    #[test]
    fn deserializes_markets_payload() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 45000,
            "market_cap": 850000000000,
            "market_cap_rank": 1,
            "fully_diluted_valuation": 950000000000,
            "total_volume": 25000000000,
            "high_24h": 46000,
            "low_24h": 44000,
            "price_change_24h": 1125,
            "price_change_percentage_24h": 2.5,
            "price_change_percentage_7d_in_currency": -3.1,
            "price_change_percentage_30d_in_currency": 12.0,
            "circulating_supply": 19800000,
            "total_supply": 21000000,
            "max_supply": 21000000,
            "roi": null,
            "last_updated": "2024-03-01T12:00:00.000Z"
        }"#;
        let coin: Coin = serde_json::from_str(json).unwrap();
        assert_eq!(coin.id, "bitcoin");
        assert_eq!(coin.current_price, 45_000.0);
        assert_eq!(coin.market_cap_rank, Some(1));
        assert_eq!(coin.price_change_percentage_24h, Some(2.5));
        assert_eq!(coin.price_change_percentage_7d, Some(-3.1));
        assert_eq!(coin.price_change_percentage_30d, Some(12.0));
        assert_eq!(coin.max_supply, Some(21_000_000.0));
    }

    #[test]
    fn null_market_figures_become_zero() {
        let json = r#"{
            "id": "deadcoin", "symbol": "dead", "name": "Dead",
            "current_price": null, "market_cap": null, "total_volume": null,
            "price_change_percentage_24h": null, "market_cap_rank": null
        }"#;
        let coin: Coin = serde_json::from_str(json).unwrap();
        assert_eq!(coin.current_price, 0.0);
        assert_eq!(coin.market_cap, 0.0);
        assert_eq!(coin.total_volume, 0.0);
        assert_eq!(coin.market_cap_rank, None);
        assert_eq!(coin.change_24h(), 0.0);
    }

    #[test]
    fn missing_fields_default() {
        let coin: Coin = serde_json::from_str(r#"{"id":"x","symbol":"x","name":"X"}"#).unwrap();
        assert_eq!(coin.image, "");
        assert_eq!(coin.current_price, 0.0);
        assert!(coin.last_updated.is_none());
    }

    #[test]
    fn change_24h_reads_field() {
        let coin = Coin {
            price_change_percentage_24h: Some(-4.2),
            ..Coin::new("eth", "eth", "Ethereum")
        };
        assert_eq!(coin.change_24h(), -4.2);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  CoinDetails & PriceHistory
// ═══════════════════════════════════════════════════════════════════

mod details {
    use super::*;

    fn sample() -> CoinDetails {
        serde_json::from_str(
            r#"{
                "id": "ethereum",
                "symbol": "eth",
                "name": "Ethereum",
                "description": {"en": "Smart contracts."},
                "image": {"thumb": "t", "small": "s", "large": "l"},
                "market_cap_rank": 2,
                "market_data": {
                    "current_price": {"usd": 3000.5, "eur": 2750.0},
                    "market_cap": {"usd": 360000000000},
                    "price_change_percentage_24h": -1.2,
                    "price_change_percentage_7d": 4.0,
                    "ath": {"usd": 4878.26},
                    "ath_date": {"usd": "2021-11-10T14:24:19.604Z"},
                    "max_supply": null
                },
                "links": {
                    "homepage": ["https://ethereum.org", "", ""],
                    "subreddit_url": "https://www.reddit.com/r/ethereum"
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_nested_structure() {
        let d = sample();
        assert_eq!(d.description.en, "Smart contracts.");
        assert_eq!(d.image.large, "l");
        assert_eq!(d.market_cap_rank, Some(2));
        assert_eq!(d.market_data.price_change_percentage_7d, Some(4.0));
        assert_eq!(d.market_data.ath.get("usd"), Some(&4878.26));
        assert_eq!(d.market_data.max_supply, None);
    }

    #[test]
    fn price_in_is_case_insensitive() {
        let d = sample();
        assert_eq!(d.price_in("USD"), Some(3000.5));
        assert_eq!(d.price_in("eur"), Some(2750.0));
        assert_eq!(d.price_in("pln"), None);
    }

    #[test]
    fn homepages_skip_blank_entries() {
        assert_eq!(sample().homepages(), vec!["https://ethereum.org"]);
    }

    #[test]
    fn minimal_details_parse() {
        let d: CoinDetails =
            serde_json::from_str(r#"{"id":"x","symbol":"x","name":"X"}"#).unwrap();
        assert!(d.market_data.current_price.is_empty());
        assert!(d.homepages().is_empty());
    }

    #[test]
    fn price_history_parses_pairs() {
        let h: PriceHistory = serde_json::from_str(
            r#"{"prices":[[1700000000000,100.5],[1700003600000,101.0]],
                "market_caps":[[1700000000000,5e9]],
                "total_volumes":[]}"#,
        )
        .unwrap();
        assert_eq!(h.prices.len(), 2);
        assert_eq!(h.prices[1][1], 101.0);
        assert_eq!(h.market_caps.len(), 1);
        assert!(h.total_volumes.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Holding & Portfolio
// ═══════════════════════════════════════════════════════════════════

mod holding {
    use super::*;

    #[test]
    fn open_copies_display_fields() {
        let h = Holding::open(&bitcoin(), 1.5, 40_000.0);
        assert_eq!(h.coin_id, "bitcoin");
        assert_eq!(h.symbol, "btc");
        assert_eq!(h.name, "Bitcoin");
        assert_eq!(h.image, "https://img/btc.png");
        assert_eq!(h.quantity, 1.5);
        assert_eq!(h.average_cost, 40_000.0);
    }

    #[test]
    fn ids_are_unique() {
        let a = Holding::open(&bitcoin(), 1.0, 1.0);
        let b = Holding::open(&bitcoin(), 1.0, 1.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn invested_and_market_value() {
        let h = Holding::open(&bitcoin(), 2.0, 3_000.0);
        assert_eq!(h.invested_value(), 6_000.0);
        assert_eq!(h.value_at(3_300.0), 6_600.0);
    }

    #[test]
    fn serializes_persisted_field_names() {
        let mut h = Holding::open(&bitcoin(), 2.0, 100.0);
        h.last_modified = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let v = serde_json::to_value(&h).unwrap();
        let obj = v.as_object().unwrap();
        for key in ["id", "coinId", "symbol", "name", "image", "amount", "averagePrice", "dateAdded"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj.len(), 8);
        assert_eq!(v["amount"], 2.0);
        assert_eq!(v["averagePrice"], 100.0);
    }

    #[test]
    fn loads_legacy_record() {
        let json = r#"{
            "id": "bitcoin-1700000000000",
            "coinId": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://img/btc.png",
            "amount": 0.5,
            "averagePrice": 42000,
            "dateAdded": "2023-11-14T22:13:20.000Z"
        }"#;
        let h: Holding = serde_json::from_str(json).unwrap();
        assert_eq!(h.id, "bitcoin-1700000000000");
        assert_eq!(h.quantity, 0.5);
        assert_eq!(h.average_cost, 42_000.0);
        assert_eq!(h.last_modified, Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap());
    }
}

mod portfolio {
    use super::*;

    #[test]
    fn serializes_as_bare_array() {
        let mut p = Portfolio::new();
        p.holdings.push(Holding::open(&bitcoin(), 1.0, 1.0));
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.is_array());
        assert_eq!(v.as_array().unwrap().len(), 1);
    }

    #[test]
    fn empty_array_loads() {
        let p: Portfolio = serde_json::from_str("[]").unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn lookups() {
        let mut p = Portfolio::new();
        let h = Holding::open(&bitcoin(), 1.0, 1.0);
        let id = h.id.clone();
        p.holdings.push(h);
        assert_eq!(p.len(), 1);
        assert!(p.get(&id).is_some());
        assert!(p.get("nope").is_none());
        assert_eq!(p.find_by_coin("bitcoin").map(|h| h.id.as_str()), Some(id.as_str()));
        assert_eq!(p.coin_ids(), vec!["bitcoin"]);
    }

    #[test]
    fn stats_serialize_with_display_names() {
        let stats = PortfolioStats {
            total_value: 1.0,
            total_invested: 2.0,
            total_pnl: -1.0,
            total_pnl_percentage: -50.0,
        };
        let v = serde_json::to_value(stats).unwrap();
        assert_eq!(v["totalValue"], 1.0);
        assert_eq!(v["totalInvested"], 2.0);
        assert_eq!(v["totalPnL"], -1.0);
        assert_eq!(v["totalPnLPercentage"], -50.0);
    }

    #[test]
    fn stats_default_is_all_zero() {
        let s = PortfolioStats::default();
        assert_eq!(s.total_value, 0.0);
        assert_eq!(s.total_invested, 0.0);
        assert_eq!(s.total_pnl, 0.0);
        assert_eq!(s.total_pnl_percentage, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Favorites, Query, Settings, Cache
// ═══════════════════════════════════════════════════════════════════

mod favorites {
    use super::*;

    #[test]
    fn serializes_as_string_list() {
        let f = Favorites {
            coin_ids: vec!["bitcoin".into(), "ethereum".into()],
        };
        assert_eq!(serde_json::to_string(&f).unwrap(), r#"["bitcoin","ethereum"]"#);
    }

    #[test]
    fn contains() {
        let f: Favorites = serde_json::from_str(r#"["solana"]"#).unwrap();
        assert!(f.contains("solana"));
        assert!(!f.contains("Solana"));
        assert_eq!(f.len(), 1);
    }
}

mod query {
    use super::*;

    #[test]
    fn defaults() {
        let q = CoinQuery::default();
        assert_eq!(q.search, "");
        assert_eq!(q.trend, TrendFilter::All);
        assert_eq!(q.sort, SortKey::MarketCap);
    }

    #[test]
    fn builders() {
        let q = CoinQuery::default()
            .with_search("bit")
            .with_trend(TrendFilter::Negative)
            .with_sort(SortKey::CurrentPrice);
        assert_eq!(q, CoinQuery::new("bit", TrendFilter::Negative, SortKey::CurrentPrice));
    }

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&TrendFilter::Positive).unwrap(), r#""positive""#);
        assert_eq!(serde_json::to_string(&SortKey::CurrentPrice).unwrap(), r#""current_price""#);
        assert_eq!(TrendFilter::Negative.to_string(), "negative");
        assert_eq!(SortKey::MarketCap.to_string(), "market_cap");
    }
}

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.vs_currency, "usd");
        assert_eq!(s.per_page, 50);
        assert!(s.degraded_mode);
        assert_eq!(s.cache_ttl_secs, 300);
        assert_eq!(s.retries, 1);
        assert!(s.api_key.is_none());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"vs_currency":"eur","degraded_mode":false}"#).unwrap();
        assert_eq!(s.vs_currency, "eur");
        assert!(!s.degraded_mode);
        assert_eq!(s.per_page, 50);
    }

    #[test]
    fn per_page_is_clamped() {
        let mut s = Settings::default();
        s.per_page = 0;
        assert_eq!(s.effective_per_page(), 1);
        s.per_page = 10_000;
        assert_eq!(s.effective_per_page(), MAX_PER_PAGE);
    }
}

mod cache {
    use super::*;

    #[test]
    fn empty_cache_is_stale() {
        assert!(!CoinCache::new().is_fresh(Utc::now(), 300));
    }

    #[test]
    fn fresh_within_ttl() {
        let now = Utc::now();
        let mut c = CoinCache::new();
        c.store(vec![bitcoin()], now);
        assert!(c.is_fresh(now + Duration::seconds(299), 300));
        assert!(!c.is_fresh(now + Duration::seconds(300), 300));
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let now = Utc::now();
        let mut c = CoinCache::new();
        c.store(vec![bitcoin()], now);
        assert!(!c.is_fresh(now, 0));
    }

    #[test]
    fn clear_resets() {
        let mut c = CoinCache::new();
        c.store(vec![bitcoin()], Utc::now());
        c.clear();
        assert!(c.coins.is_empty());
        assert!(c.fetched_at.is_none());
    }
}
