/// Number of inputs the tabular model consumes.
pub const FEATURE_COUNT: usize = 13;

/// Ordered list of feature names.
/// This order MUST match exactly with the column order the tabular model was trained with.
/// Any change here is a breaking change for deployed models.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "open",
    "low",
    "close",
    "volume",
    "marketcap",
    "price_change",
    "volatility_abs",
    "ret_1d",
    "ret_7d",
    "ma_7",
    "ma_30",
    "vol_ma_7",
    "vol_ma_30",
];

/// Daily market snapshot consumed by the tabular model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    pub open: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub marketcap: f64,
    pub price_change: f64,
    pub volatility_abs: f64,
    pub ret_1d: f64,
    pub ret_7d: f64,
    pub ma_7: f64,
    pub ma_30: f64,
    pub vol_ma_7: f64,
    pub vol_ma_30: f64,
}

impl FeatureVector {
    /// Builds a vector from values laid out in `FEATURE_NAMES` order.
    pub fn from_ordered(values: [f64; FEATURE_COUNT]) -> Self {
        let [
            open,
            low,
            close,
            volume,
            marketcap,
            price_change,
            volatility_abs,
            ret_1d,
            ret_7d,
            ma_7,
            ma_30,
            vol_ma_7,
            vol_ma_30,
        ] = values;

        Self {
            open,
            low,
            close,
            volume,
            marketcap,
            price_change,
            volatility_abs,
            ret_1d,
            ret_7d,
            ma_7,
            ma_30,
            vol_ma_7,
            vol_ma_30,
        }
    }

    /// Flattens the features into model input order.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.open,
            self.low,
            self.close,
            self.volume,
            self.marketcap,
            self.price_change,
            self.volatility_abs,
            self.ret_1d,
            self.ret_7d,
            self.ma_7,
            self.ma_30,
            self.vol_ma_7,
            self.vol_ma_30,
        ]
    }
}
