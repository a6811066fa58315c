//! Default image paths for catalog entries added without photos.
//!
//! Photos live under `/images/places/<stem>-<n>.jpg`. Korean names have no
//! ASCII slug, so known places carry a hand-romanized stem.

use std::collections::HashMap;
use std::sync::LazyLock;

pub const IMAGE_BASE_PATH: &str = "/images/places";

/// Number of paths assigned to an entry that has no images.
pub const DEFAULT_IMAGE_COUNT: usize = 3;

/// Stem used when a name has neither a known romanization nor ASCII content.
pub const FALLBACK_STEM: &str = "place";

static ROMANIZED_NAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // 서울
        ("연남서식", "yeonnam-seosik"),
        ("애경 앤트러사이트", "aekyung-anthracite"),
        ("카페 온리", "cafe-only"),
        ("블루보틀 청담", "bluebottle-cheongdam"),
        ("대림창고", "daelim-warehouse"),
        ("어니언", "onion"),
        ("테라로사", "terarosa"),
        ("소울컴팩트", "soul-compact"),
        ("카페 예쁜날", "cafe-yeppeunnal"),
        ("로스터리 베네", "roastery-bene"),
        ("커피리브레", "coffee-libre"),
        ("카페 서울", "cafe-seoul"),
        // 제주
        ("몽상드애월", "monsant-aewol"),
        ("Mônsant de Aewol", "monsant-aewol"),
        ("원앤온리", "one-and-only"),
        ("카페 한라산", "cafe-hallasan"),
        ("Café Hallasan", "cafe-hallasan"),
        ("명월초등학교", "myeongwol-school"),
        ("Myeongwol Elementary School", "myeongwol-school"),
        ("플로웨이브", "flowave"),
        ("제주 애월 봄날카페", "jeju-aewol-bomnal"),
        ("카페 델문도", "cafe-delmundo"),
        ("카페 꼼마", "cafe-comma"),
        ("이니스프리 하우스", "innisfree-house"),
        ("오설록 티뮤지엄", "osulloc-tea-museum"),
        ("카페 마노르블랑", "cafe-manor-blanc"),
        ("더 클리프", "the-cliff"),
        // 부산
        ("흰여울문화마을", "huinyeoul-village"),
        ("감천문화마을", "gamcheon-village"),
        ("해동용궁사", "haedong-yonggungsa"),
        ("태종대", "taejongdae"),
        ("광안리해변", "gwangalli-beach"),
        ("부산타워", "busan-tower"),
        ("자갈치시장", "jagalchi-market"),
        ("센텀시티", "centum-city"),
        ("송도해변", "songdo-beach"),
        ("오륙도", "oryukdo"),
        // 강릉
        ("강릉 안목해변", "gangneung-anmok-beach"),
        ("안목해변", "anmok-beach"),
        ("경포해변", "gyeongpo-beach"),
        ("정동진", "jeongdongjin"),
        ("오죽헌", "ojukheon"),
        ("참소리박물관", "chamsori-museum"),
        ("커피커퍼", "coffee-cupper"),
        ("테라로사 강릉", "terarosa-gangneung"),
        // 전주
        ("전주한옥마을", "jeonju-hanok-village"),
        ("한옥마을", "hanok-village"),
        ("경기전", "gyeonggijeon"),
        ("오목대", "omokdae"),
        ("전동성당", "jeondong-cathedral"),
        ("한국전통문화전당", "korean-traditional-culture-center"),
        // 경주
        ("불국사", "bulguksa"),
        ("석굴암", "seokguram"),
        ("첨성대", "cheomseongdae"),
        ("안압지", "anapji"),
        ("대릉원", "daereungwon"),
        ("국립경주박물관", "gyeongju-national-museum"),
        // 여수
        ("여수 밤바다", "yeosu-night-sea"),
        ("오동도", "odongdo"),
        ("여수세계박람회장", "yeosu-expo"),
        ("하멜등대", "hamel-lighthouse"),
        ("돌산대교", "dolsan-bridge"),
        // 속초
        ("속초해변", "sokcho-beach"),
        ("설악산", "seoraksan"),
        ("속초중앙시장", "sokcho-jungang-market"),
        ("아바이마을", "abai-village"),
        // 통영
        ("루지", "luge"),
        ("케이블카", "cable-car"),
        ("동피랑벽화마을", "dongpirang-village"),
        ("한산도", "hansando"),
        // 담양
        ("죽녹원", "juknokwon"),
        ("메타세쿼이아길", "metasequoia-road"),
        ("관방제림", "gwanbangjerim"),
        // 안동
        ("하회마을", "hahoe-village"),
        ("안동 간고등어", "andong-mackerel"),
        ("도산서원", "dosan-seowon"),
        // 기타
        ("남이섬", "nami-island"),
        ("인사동", "insadong"),
        ("명동", "myeongdong"),
        ("홍대", "hongdae"),
        ("이태원", "itaewon"),
        ("강남", "gangnam"),
        ("종로", "jongno"),
        ("을지로", "euljiro"),
    ])
});

/// Known romanization for a place name, if any.
#[must_use]
pub fn romanized_name(name: &str) -> Option<&'static str> {
    ROMANIZED_NAMES.get(name.trim()).copied()
}

/// File stem for a place's images.
///
/// Known names map through the romanization table. Anything else is
/// lowercased with non-alphanumeric ASCII removed and whitespace runs
/// turned into single hyphens. A name with nothing left falls back to
/// [`FALLBACK_STEM`].
#[must_use]
pub fn image_file_stem(name: &str) -> String {
    if let Some(stem) = romanized_name(name) {
        return stem.to_string();
    }

    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    let stem = cleaned.split_whitespace().collect::<Vec<_>>().join("-");

    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// `count` numbered paths (`<stem>-1.jpg` onward) for a place name.
#[must_use]
pub fn image_paths(name: &str, count: usize) -> Vec<String> {
    let stem = image_file_stem(name);
    (1..=count)
        .map(|n| format!("{IMAGE_BASE_PATH}/{stem}-{n}.jpg"))
        .collect()
}

/// Keeps existing images; otherwise assigns [`DEFAULT_IMAGE_COUNT`] paths.
#[must_use]
pub fn assign_images(name: &str, existing: &[String]) -> Vec<String> {
    if existing.is_empty() {
        image_paths(name, DEFAULT_IMAGE_COUNT)
    } else {
        existing.to_vec()
    }
}
