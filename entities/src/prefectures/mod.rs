use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

/// One row of the prefecture vocabulary. `romanized` is the key the upstream
/// feeds use, `native` is the name written to snapshots.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Prefecture {
    code: usize,
    romanized: &'static str,
    native: &'static str,
}

impl Prefecture {
    const fn new(code: usize, romanized: &'static str, native: &'static str) -> Self {
        Self {
            code,
            romanized,
            native,
        }
    }

    /// Position in the table. 0 is the nationwide aggregate, 1..=47 follow the
    /// JIS X 0401 prefecture codes.
    pub fn code(&self) -> usize {
        self.code
    }

    pub fn romanized(&self) -> &'static str {
        self.romanized
    }

    pub fn native(&self) -> &'static str {
        self.native
    }

    pub fn is_nationwide(&self) -> bool {
        self.code == NATIONWIDE_CODE
    }

    pub fn nationwide() -> &'static Prefecture {
        &PREFECTURES[NATIONWIDE_CODE]
    }

    /// Every prefecture in table order, without the nationwide aggregate.
    pub fn regions() -> impl Iterator<Item = &'static Prefecture> {
        PREFECTURES.iter().skip(1)
    }

    pub fn by_romanized(key: &str) -> Option<&'static Prefecture> {
        BY_ROMANIZED.get(key).map(|code| &PREFECTURES[*code])
    }

    pub fn by_native(name: &str) -> Option<&'static Prefecture> {
        BY_NATIVE.get(name).map(|code| &PREFECTURES[*code])
    }
}

impl fmt::Display for Prefecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.native, self.romanized)
    }
}

const NATIONWIDE_CODE: usize = 0;

pub static PREFECTURES: [Prefecture; 48] = [
    Prefecture::new(0, "ALL", "全国"),
    Prefecture::new(1, "Hokkaido", "北海道"),
    Prefecture::new(2, "Aomori", "青森県"),
    Prefecture::new(3, "Iwate", "岩手県"),
    Prefecture::new(4, "Miyagi", "宮城県"),
    Prefecture::new(5, "Akita", "秋田県"),
    Prefecture::new(6, "Yamagata", "山形県"),
    Prefecture::new(7, "Fukushima", "福島県"),
    Prefecture::new(8, "Ibaraki", "茨城県"),
    Prefecture::new(9, "Tochigi", "栃木県"),
    Prefecture::new(10, "Gunma", "群馬県"),
    Prefecture::new(11, "Saitama", "埼玉県"),
    Prefecture::new(12, "Chiba", "千葉県"),
    Prefecture::new(13, "Tokyo", "東京都"),
    Prefecture::new(14, "Kanagawa", "神奈川県"),
    Prefecture::new(15, "Niigata", "新潟県"),
    Prefecture::new(16, "Toyama", "富山県"),
    Prefecture::new(17, "Ishikawa", "石川県"),
    Prefecture::new(18, "Fukui", "福井県"),
    Prefecture::new(19, "Yamanashi", "山梨県"),
    Prefecture::new(20, "Nagano", "長野県"),
    Prefecture::new(21, "Gifu", "岐阜県"),
    Prefecture::new(22, "Shizuoka", "静岡県"),
    Prefecture::new(23, "Aichi", "愛知県"),
    Prefecture::new(24, "Mie", "三重県"),
    Prefecture::new(25, "Shiga", "滋賀県"),
    Prefecture::new(26, "Kyoto", "京都府"),
    Prefecture::new(27, "Osaka", "大阪府"),
    Prefecture::new(28, "Hyogo", "兵庫県"),
    Prefecture::new(29, "Nara", "奈良県"),
    Prefecture::new(30, "Wakayama", "和歌山県"),
    Prefecture::new(31, "Tottori", "鳥取県"),
    Prefecture::new(32, "Shimane", "島根県"),
    Prefecture::new(33, "Okayama", "岡山県"),
    Prefecture::new(34, "Hiroshima", "広島県"),
    Prefecture::new(35, "Yamaguchi", "山口県"),
    Prefecture::new(36, "Tokushima", "徳島県"),
    Prefecture::new(37, "Kagawa", "香川県"),
    Prefecture::new(38, "Ehime", "愛媛県"),
    Prefecture::new(39, "Kochi", "高知県"),
    Prefecture::new(40, "Fukuoka", "福岡県"),
    Prefecture::new(41, "Saga", "佐賀県"),
    Prefecture::new(42, "Nagasaki", "長崎県"),
    Prefecture::new(43, "Kumamoto", "熊本県"),
    Prefecture::new(44, "Oita", "大分県"),
    Prefecture::new(45, "Miyazaki", "宮崎県"),
    Prefecture::new(46, "Kagoshima", "鹿児島県"),
    Prefecture::new(47, "Okinawa", "沖縄県"),
];

lazy_static! {
    static ref BY_ROMANIZED: HashMap<&'static str, usize> = PREFECTURES
        .iter()
        .map(|prefecture| (prefecture.romanized, prefecture.code))
        .collect();
    static ref BY_NATIVE: HashMap<&'static str, usize> = PREFECTURES
        .iter()
        .map(|prefecture| (prefecture.native, prefecture.code))
        .collect();
}
