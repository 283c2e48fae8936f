//! Reference datasets shared by the unit tests.
//!
//! Expected values were computed independently in double precision; the
//! alpha values agree with published results for these datasets (0.847 and
//! 0.893).

/// 15 persons x 4 items, positively correlated ratings.
pub const FIFTEEN_BY_FOUR: [[f64; 4]; 15] = [
    [2.0, 3.0, 3.0, 3.0],
    [3.0, 3.0, 4.0, 4.0],
    [4.0, 4.0, 3.0, 4.0],
    [5.0, 4.0, 3.0, 4.0],
    [3.0, 4.0, 2.0, 4.0],
    [3.0, 3.0, 4.0, 3.0],
    [4.0, 3.0, 4.0, 4.0],
    [3.0, 3.0, 2.0, 2.0],
    [4.0, 5.0, 5.0, 5.0],
    [2.0, 2.0, 1.0, 2.0],
    [4.0, 3.0, 4.0, 3.0],
    [3.0, 4.0, 3.0, 3.0],
    [3.0, 4.0, 4.0, 3.0],
    [3.0, 4.0, 3.0, 4.0],
    [5.0, 5.0, 5.0, 4.0],
];

pub const FIFTEEN_BY_FOUR_ALPHA: f64 = 0.847_264_182_611_614_7;
pub const FIFTEEN_BY_FOUR_ALPHA_CI: (f64, f64) = (0.664_660_501_151_955_5, 0.942_704_668_459_416_8);
pub const FIFTEEN_BY_FOUR_LAMBDAS: [f64; 6] = [
    0.635_448_136_958_711,
    0.848_154_187_203_384_5,
    0.847_264_182_611_614_7,
    0.872_104_733_131_923_6,
    0.833_430_042_813_066_5,
    0.814_885_149_372_392_8,
];
/// Lambda 4 for the first-half / second-half split only.
pub const FIFTEEN_BY_FOUR_LAMBDA4_FIXED: f64 = 0.845_921_450_151_057_7;

/// 10 persons x 3 items.
pub const TEN_BY_THREE: [[f64; 3]; 10] = [
    [1.0, 1.0, 1.0],
    [2.0, 1.0, 1.0],
    [2.0, 1.0, 2.0],
    [3.0, 2.0, 3.0],
    [1.0, 1.0, 1.0],
    [2.0, 3.0, 3.0],
    [3.0, 2.0, 3.0],
    [3.0, 3.0, 3.0],
    [2.0, 3.0, 2.0],
    [3.0, 3.0, 3.0],
];

pub const TEN_BY_THREE_LAMBDAS: [f64; 6] = [
    0.595_419_847_328_244_4,
    0.897_212_174_057_569_5,
    0.893_129_770_992_366_6,
    0.885_496_183_206_107,
    0.908_676_099_674_552_7,
    0.889_610_034_278_835_1,
];

/// `(icc, f, df1, df2, p_value, ci_lower, ci_upper)` for ICC1, ICC2, ICC3,
/// ICC1k, ICC2k, ICC3k at the 95% level.
pub const FIFTEEN_BY_FOUR_ICC: [(f64, f64, f64, f64, f64, f64, f64); 6] = [
    (
        0.589_958_158_995_815_8,
        6.755_102_040_816_325,
        14.0,
        45.0,
        4.042_975_817_648_707_5e-7,
        0.345_274_092_622_838_2,
        0.808_894_975_000_006_8,
    ),
    (
        0.588_619_402_985_074_5,
        6.547_252_747_252_745,
        14.0,
        42.0,
        9.700_450_450_136_549e-7,
        0.340_855_525_113_443_2,
        0.808_801_476_559_319_7,
    ),
    (
        0.581_031_307_550_644_5,
        6.547_252_747_252_745,
        14.0,
        42.0,
        9.700_450_450_136_549e-7,
        0.331_333_186_756_252_8,
        0.804_433_769_825_616_9,
    ),
    (
        0.851_963_746_223_565,
        6.755_102_040_816_325,
        14.0,
        45.0,
        4.042_975_817_648_707_5e-7,
        0.678_397_316_654_451_1,
        0.944_230_348_227_889_1,
    ),
    (
        0.851_264_755_480_607_1,
        6.547_252_747_252_745,
        14.0,
        42.0,
        9.700_450_450_136_549e-7,
        0.674_104_930_377_56,
        0.944_198_495_138_342_3,
    ),
    (
        0.847_264_182_611_614_6,
        6.547_252_747_252_745,
        14.0,
        42.0,
        9.700_450_450_136_549e-7,
        0.664_660_501_151_955_2,
        0.942_704_668_459_416_7,
    ),
];
