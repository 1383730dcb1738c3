use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use url::Url;

use crate::core::errors::{MarketError, MarketResult};
use crate::core::types::{CurrencyId, Quote};
use crate::market::MarketDataProvider;

/// 默认的通货交易站点
pub const DEFAULT_HOST: &str = "currency.poe.trade";

// 包含报价数据的行以此开头
const OFFER_MARKER: &str = "<div class=\"displayoffer \" data-username=";

// 报价行必须带有的属性
const REQUIRED_ATTRIBUTES: [&str; 5] = [
    "data-sellcurrency",
    "data-sellvalue",
    "data-buycurrency",
    "data-buyvalue",
    "data-ign",
];

/// 页面上的一条挂单
///
/// 站点的视角是卖家：`sell_value` 是我们收到的数量，`buy_value` 是我们要付出的数量。
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub username: String,
    pub sell_currency: CurrencyId,
    pub sell_value: f64,
    pub buy_currency: CurrencyId,
    pub buy_value: f64,
    pub stock: Option<u64>,
}

impl Offer {
    /// 持有 `available` 时能否成交
    pub fn is_affordable(&self, available: u64) -> bool {
        self.buy_value <= available as f64
    }

    pub fn into_quote(self) -> Quote {
        Quote {
            seller: self.username,
            pay_amount: self.buy_value,
            receive_amount: self.sell_value,
            stock: self.stock,
        }
    }
}

fn is_offer_row(line: &str) -> bool {
    line.contains(OFFER_MARKER) && REQUIRED_ATTRIBUTES.iter().all(|attr| line.contains(attr))
}

/// 读取 `name="value"` 形式的属性值
fn attribute<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", name);
    let start = line.find(&needle)? + needle.len();
    let end = line[start..].find('"')? + start;
    Some(&line[start..end])
}

fn required<'a>(line: &'a str, name: &str) -> MarketResult<&'a str> {
    attribute(line, name).ok_or_else(|| MarketError::MalformedOffer(format!("missing {}", name)))
}

fn parse_field<T: std::str::FromStr>(line: &str, name: &str) -> MarketResult<T> {
    let raw = required(line, name)?;
    raw.parse()
        .map_err(|_| MarketError::MalformedOffer(format!("{}=\"{}\"", name, raw)))
}

/// 解析单条报价行
///
/// 行的格式：
/// `<div class="displayoffer " data-username="GOrdonFlicker" data-sellcurrency="1" data-sellvalue="4.0" data-buycurrency="2" data-buyvalue="1.0" data-ign="Rangeroided" data-stock="45">`
pub fn parse_offer_line(line: &str) -> MarketResult<Offer> {
    let buy_value: f64 = parse_field(line, "data-buyvalue")?;
    if !buy_value.is_finite() || buy_value <= 0.0 {
        return Err(MarketError::MalformedOffer(format!(
            "data-buyvalue must be positive, got {}",
            buy_value
        )));
    }

    Ok(Offer {
        username: required(line, "data-username")?.to_string(),
        sell_currency: parse_field(line, "data-sellcurrency")?,
        sell_value: parse_field(line, "data-sellvalue")?,
        buy_currency: parse_field(line, "data-buycurrency")?,
        buy_value,
        stock: attribute(line, "data-stock").and_then(|raw| raw.parse().ok()),
    })
}

/// 按页面顺序返回第一个买得起的报价
///
/// 逐行解析，找到后立即停止，后面的行不再检查。
pub fn first_affordable(body: &str, available: u64) -> MarketResult<Option<Offer>> {
    for line in body.lines().filter(|line| is_offer_row(line)) {
        let offer = parse_offer_line(line)?;
        if offer.is_affordable(available) {
            return Ok(Some(offer));
        }
    }
    Ok(None)
}

/// currency.poe.trade 的 HTTP 行情客户端
pub struct PoeTradeClient {
    client: Client,
    base_url: Url,
    league: String,
}

impl PoeTradeClient {
    /// `host` 可以带协议，也可以只是域名（默认 http）
    pub fn new(host: &str, league: impl Into<String>) -> MarketResult<Self> {
        let root = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };
        let base_url = Url::parse(&root)?.join("search")?;

        Ok(Self {
            client: Client::new(),
            base_url,
            league: league.into(),
        })
    }

    pub fn league(&self) -> &str {
        &self.league
    }

    /// 构造查询地址
    pub fn search_url(&self, have: CurrencyId, want: CurrencyId) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("league", &self.league)
            .append_pair("online", "x")
            .append_pair("stock", "")
            .append_pair("want", &want.to_string())
            .append_pair("have", &have.to_string());
        url
    }
}

#[async_trait]
impl MarketDataProvider for PoeTradeClient {
    fn name(&self) -> &str {
        "poe.trade"
    }

    async fn best_offer(
        &self,
        have: CurrencyId,
        want: CurrencyId,
        available: u64,
    ) -> MarketResult<Option<Quote>> {
        let url = self.search_url(have, want);
        info!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header("User-Agent", "currency-spy/0.1.0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        match first_affordable(&body, available)? {
            Some(offer) => {
                debug!("最佳报价: {:?}", offer);
                Ok(Some(offer.into_quote()))
            }
            None => {
                debug!("have={} want={} 没有买得起的报价 (持有 {})", have, want, available);
                Ok(None)
            }
        }
    }
}
