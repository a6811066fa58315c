//! Prompt templates.
//!
//! Both prompts ask for bare JSON. Replies still arrive fenced often enough
//! that [`crate::clean::strip_code_fences`] runs on every reply regardless.

use std::fmt::Write as _;

use scentmap_core::HotplaceDestination;

const CONVERSION_INSTRUCTIONS: &str = r#"당신은 향기 여행지 정보를 구조화된 JSON으로 정리하는 편집자입니다.
아래 자연어 설명에 등장하는 모든 장소를 다음 형태의 객체로 변환하세요.

{
  "name": string,
  "category": "cafe" | "culture" | "gallery" | "nature" | "coastal" | "urban" | "traditional" | "festival" | "mountain" | "unique",
  "location": {
    "region": string,
    "address": string,
    "coordinates": { "lat": number, "lng": number }
  },
  "description": string,
  "specialFeature": string,
  "atmosphere": string,
  "signatureScent": { "name": string, "notes": string[], "experience": string },
  "visitInfo": { "openingHours": string, "bestTime": string, "tips": string },
  "transportation": string,
  "images": string[],
  "tags": string[],
  "featured": boolean
}

규칙:
- coordinates는 주소로부터 추정한 위도와 경도를 넣으세요.
- region은 "서울 마포구"처럼 세부 구역이 붙어 있으면 "서울"만 남기세요.
- images는 "/images/places/<영문-소문자-하이픈>.jpg" 형식으로 하나 이상 만드세요.
- tags는 장소의 성격을 드러내는 3~7개를 만드세요.
- featured는 true로 두세요.
- category는 위 목록 중 가장 가까운 값 하나를 고르세요.

출력 형식:
- 설명, 마크다운, 코드 블록 없이 JSON 배열 하나만 출력하세요.
- 첫 글자는 '[' 마지막 글자는 ']' 이어야 합니다.
- 장소가 하나여도 배열에 담으세요.
- 모든 문자열과 괄호를 끝까지 닫으세요."#;

const ENHANCEMENT_INSTRUCTIONS: &str = r#"당신은 향기 여행 큐레이터입니다. 아래 장소 정보를 바탕으로 더 깊이 있는 소개 자료를 작성하세요.

다음 형태의 JSON 객체 하나만 반환하세요.

{
  "enhancedDescription": "공간을 감성적으로 풀어낸 설명 (200~300자)",
  "detailedScentProfile": {
    "topNotes": ["탑 노트 3~4개"],
    "middleNotes": ["미들 노트 3~4개"],
    "baseNotes": ["베이스 노트 2~3개"],
    "scentIntensity": 7,
    "scentDuration": "지속 시간 (예: 2~3시간)",
    "seasonalRecommendation": "어울리는 계절"
  },
  "atmosphereDetails": {
    "visualElements": ["시각 요소 4~5개"],
    "soundscape": ["소리 요소 2~3개"],
    "tactileElements": ["촉감 요소 2~3개"],
    "overallMood": "분위기 한 줄 요약"
  },
  "visitExperience": {
    "bestTimeToVisit": "추천 시간대와 이유",
    "averageStayDuration": "평균 체류 시간",
    "crowdLevel": "조용함 / 보통 / 북적임",
    "photoSpots": ["사진 명소 2~3곳"],
    "insiderTips": ["방문 팁 2~3개"]
  },
  "scentJourneyStory": "이 공간의 향을 따라가는 짧은 이야기 (300~400자)",
  "nearbyRecommendations": [
    { "name": "근처 장소", "type": "카테고리", "description": "한 줄 소개", "walkingTime": "도보 시간" }
  ],
  "pairingRecommendations": {
    "perfumes": ["어울리는 향수 2~3개"],
    "candles": ["어울리는 캔들 향 2~3개"],
    "music": ["어울리는 음악 2~3개"]
  }
}

주의:
- 실제 장소의 특성에 맞게 현실적으로 쓰세요.
- scentIntensity는 1~10 사이의 숫자로 쓰세요.
- 코드 블록 없이 순수 JSON만 반환하세요."#;

/// Prompt used once before a batch to detect quota exhaustion.
pub const PROBE_PROMPT: &str = "안녕하세요";

/// Conversion prompt with the free-form input appended.
#[must_use]
pub fn conversion_prompt(natural_language: &str) -> String {
    format!("{CONVERSION_INSTRUCTIONS}\n\n변환할 내용:\n{natural_language}")
}

/// Enhancement prompt describing `place`.
#[must_use]
pub fn enhancement_prompt(place: &HotplaceDestination) -> String {
    let mut prompt = String::with_capacity(ENHANCEMENT_INSTRUCTIONS.len() + 1024);
    prompt.push_str(ENHANCEMENT_INSTRUCTIONS);
    prompt.push_str("\n\n장소 정보:\n");

    let scent = &place.signature_scent;
    let visit = &place.visit_info;
    let tags = if place.tags.is_empty() {
        "없음".to_owned()
    } else {
        place.tags.join(", ")
    };

    // Writing to a String cannot fail.
    let _ = writeln!(prompt, "이름: {}", place.name);
    let _ = writeln!(prompt, "카테고리: {}", place.category);
    let _ = writeln!(
        prompt,
        "위치: {}, {}",
        place.location.region, place.location.address
    );
    let _ = writeln!(prompt, "기본 설명: {}", place.description);
    let _ = writeln!(prompt, "특징: {}", place.special_feature);
    let _ = writeln!(prompt, "분위기: {}", place.atmosphere);
    let _ = writeln!(
        prompt,
        "시그니처 향: {} ({}) - {}",
        scent.name,
        scent.notes.join(", "),
        scent.experience
    );
    let _ = writeln!(
        prompt,
        "방문 정보: 운영 {} / 추천 시간 {} / 팁 {}",
        visit.opening_hours, visit.best_time, visit.tips
    );
    let _ = writeln!(prompt, "태그: {tags}");
    prompt
}
