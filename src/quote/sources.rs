//! Liquidity sources known to the 0x swap API

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! liquidity_sources {
    ($($variant:ident => $wire:literal,)*) => {
        /// An exchange or pool the aggregator may route through
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum LiquiditySource {
            $(
                #[serde(rename = $wire)]
                $variant,
            )*
        }

        impl LiquiditySource {
            /// Every source, in the API's catalogue order
            pub const ALL: &'static [LiquiditySource] = &[$(LiquiditySource::$variant,)*];

            /// Name used in `excludedSources`
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(LiquiditySource::$variant => $wire,)*
                }
            }
        }
    };
}

liquidity_sources! {
    Native => "Native",
    Uniswap => "Uniswap",
    UniswapV2 => "Uniswap_V2",
    Eth2Dai => "Eth2Dai",
    Kyber => "Kyber",
    Curve => "Curve",
    LiquidityProvider => "LiquidityProvider",
    MultiBridge => "MultiBridge",
    Balancer => "Balancer",
    BalancerV2 => "Balancer_V2",
    Cream => "CREAM",
    Bancor => "Bancor",
    MakerPsm => "MakerPsm",
    MStable => "mStable",
    Mooniswap => "Mooniswap",
    MultiHop => "MultiHop",
    Shell => "Shell",
    Swerve => "Swerve",
    SnowSwap => "SnowSwap",
    SushiSwap => "SushiSwap",
    Dodo => "DODO",
    DodoV2 => "DODO_V2",
    CryptoCom => "CryptoCom",
    Linkswap => "Linkswap",
    KyberDmm => "KyberDMM",
    Smoothy => "Smoothy",
    Component => "Component",
    Saddle => "Saddle",
    XSigma => "xSigma",
    UniswapV3 => "Uniswap_V3",
    CurveV2 => "Curve_V2",
    Lido => "Lido",
    ShibaSwap => "ShibaSwap",
    Clipper => "Clipper",
    // BSC only
    PancakeSwap => "PancakeSwap",
    PancakeSwapV2 => "PancakeSwap_V2",
    BakerySwap => "BakerySwap",
    Nerve => "Nerve",
    Belt => "Belt",
    Ellipsis => "Ellipsis",
    ApeSwap => "ApeSwap",
    CafeSwap => "CafeSwap",
    CheeseSwap => "CheeseSwap",
    JulSwap => "JulSwap",
    ACryptos => "ACryptoS",
    // Polygon only
    QuickSwap => "QuickSwap",
    ComethSwap => "ComethSwap",
    Dfyn => "Dfyn",
    WaultSwap => "WaultSwap",
    Polydex => "Polydex",
    FirebirdOneSwap => "FirebirdOneSwap",
    JetSwap => "JetSwap",
    IronSwap => "IronSwap",
}

impl fmt::Display for LiquiditySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sources to exclude so only `allowed` remain; `Native` is always excluded.
pub fn excluded_sources(allowed: Option<&[LiquiditySource]>) -> Vec<LiquiditySource> {
    match allowed {
        Some(allowed) if !allowed.is_empty() => LiquiditySource::ALL
            .iter()
            .copied()
            .filter(|source| *source == LiquiditySource::Native || !allowed.contains(source))
            .collect(),
        _ => vec![LiquiditySource::Native],
    }
}
