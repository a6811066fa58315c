use super::*;
use crate::filters::{FeatureFilter, RegionFilter, ScentNoteFilter};
use crate::places::fixtures::place;

fn ids(places: &[HotplaceDestination]) -> Vec<&str> {
    places.iter().map(|p| p.id.as_str()).collect()
}

/// Small mixed catalog: two Seoul cafes, a Jeju beach, a Busan village.
fn catalog() -> Vec<HotplaceDestination> {
    let mut osechill = place("osechill", "Osechill", Category::Cafe, "서울");
    osechill.location.address = "서울특별시 마포구 토정로5길 17 1F".into();
    osechill.description = "컬러풀한 디저트로 유명한 감성 카페".into();
    osechill.atmosphere = "활기차고 트렌디한 분위기".into();
    osechill.signature_scent.name = "Colorful Dreams".into();
    osechill.signature_scent.notes = vec!["에스프레소".into(), "베리".into(), "바닐라".into()];
    osechill.tags = vec!["아티스트카페".into(), "합정".into()];
    osechill.featured = true;

    let mut aya = place("aya", "Aya Coffee", Category::Cafe, "서울");
    aya.location.address = "서울 강남구 언주로94길 11 1층".into();
    aya.description = "크로플로 유명한 로스터리 카페".into();
    aya.atmosphere = "모던하고 조용한 분위기".into();
    aya.signature_scent.notes = vec!["로스팅 커피".into(), "버터".into(), "우디".into()];
    aya.tags = vec!["Roastery".into(), "강남".into()];

    let mut hyeopjae = place("hyeopjae", "협재해변", Category::Coastal, "제주");
    hyeopjae.location.address = "제주특별자치도 제주시 한림읍 협재리".into();
    hyeopjae.description = "에메랄드빛 바다".into();
    hyeopjae.special_feature = "비양도 전망".into();
    hyeopjae.atmosphere = "평화롭고 낭만적인 분위기".into();
    hyeopjae.signature_scent.name = "Emerald Breeze".into();
    hyeopjae.signature_scent.notes = vec!["바다바람".into(), "소금기".into()];
    hyeopjae.featured = true;

    let mut huinyeoul = place("huinyeoul", "흰여울문화마을", Category::Culture, "부산");
    huinyeoul.location.address = "부산광역시 영도구 영선동4가 1043-6".into();
    huinyeoul.special_feature = "절벽 위 하얀 집들".into();
    huinyeoul.atmosphere = "이국적이고 낭만적인 분위기".into();
    huinyeoul.signature_scent.notes = vec!["바다바람".into(), "하얀페인트".into()];
    huinyeoul.tags = vec!["포토존".into()];

    vec![osechill, aya, hyeopjae, huinyeoul]
}

// ---------------------------------------------------------------------------
// filter_hotplaces
// ---------------------------------------------------------------------------

#[test]
fn empty_filters_return_catalog_unchanged() {
    let catalog = catalog();
    let result = filter_hotplaces(&catalog, &ScentMapFilters::default());
    assert_eq!(result, catalog);
}

#[test]
fn empty_catalog_yields_empty_result() {
    let filters = ScentMapFilters {
        tags: vec!["카페".into()],
        ..ScentMapFilters::default()
    };
    assert!(filter_hotplaces(&[], &filters).is_empty());
}

#[test]
fn result_is_an_ordered_subsequence() {
    let catalog = catalog();
    let filters = ScentMapFilters {
        atmosphere: vec!["낭만적".into()],
        ..ScentMapFilters::default()
    };
    let result = filter_hotplaces(&catalog, &filters);
    assert_eq!(ids(&result), vec!["hyeopjae", "huinyeoul"]);

    let mut cursor = catalog.iter();
    for kept in &result {
        assert!(
            cursor.any(|c| c == kept),
            "{} is out of order or not from the catalog",
            kept.id
        );
    }
}

#[test]
fn category_filter_keeps_members_in_order() {
    let catalog = vec![
        place("a", "A", Category::Cafe, "서울"),
        place("b", "B", Category::Nature, "서울"),
        place("c", "C", Category::Cafe, "서울"),
    ];
    let filters = ScentMapFilters {
        categories: vec![Category::Cafe],
        ..ScentMapFilters::default()
    };
    assert_eq!(ids(&filter_hotplaces(&catalog, &filters)), vec!["a", "c"]);
}

#[test]
fn province_is_exact_match() {
    let catalog = vec![place("seoul", "S", Category::Cafe, "서울")];

    let busan = ScentMapFilters {
        region: RegionFilter {
            province: Some("부산".into()),
            ..RegionFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert!(filter_hotplaces(&catalog, &busan).is_empty());

    let seoul = ScentMapFilters {
        region: RegionFilter {
            province: Some("서울".into()),
            ..RegionFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert_eq!(ids(&filter_hotplaces(&catalog, &seoul)), vec!["seoul"]);

    let prefix = ScentMapFilters {
        region: RegionFilter {
            province: Some("서".into()),
            ..RegionFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert!(filter_hotplaces(&catalog, &prefix).is_empty());
}

#[test]
fn city_and_district_match_address_substrings() {
    let catalog = catalog();
    let filters = ScentMapFilters {
        region: RegionFilter {
            province: None,
            city: Some("제주시".into()),
            district: Some("한림읍".into()),
        },
        ..ScentMapFilters::default()
    };
    assert_eq!(ids(&filter_hotplaces(&catalog, &filters)), vec!["hyeopjae"]);

    let mismatch = ScentMapFilters {
        region: RegionFilter {
            province: None,
            city: Some("마포구".into()),
            district: Some("한림읍".into()),
        },
        ..ScentMapFilters::default()
    };
    assert!(filter_hotplaces(&catalog, &mismatch).is_empty());
}

#[test]
fn city_match_is_case_sensitive() {
    let mut p = place("x", "X", Category::Urban, "서울");
    p.location.address = "Seongsu-dong, Seoul".into();
    let filters = ScentMapFilters {
        region: RegionFilter {
            city: Some("seoul".into()),
            ..RegionFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert!(filter_hotplaces(&[p], &filters).is_empty());
}

#[test]
fn note_matching_is_bidirectional() {
    let mut entry_short = place("short", "S", Category::Cafe, "서울");
    entry_short.signature_scent.notes = vec!["우디".into()];
    let mut entry_long = place("long", "L", Category::Cafe, "서울");
    entry_long.signature_scent.notes = vec!["우디향".into()];

    let select_long = ScentMapFilters {
        scent_notes: ScentNoteFilter {
            base_notes: vec!["우디향".into()],
            ..ScentNoteFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert_eq!(
        ids(&filter_hotplaces(&[entry_short.clone()], &select_long)),
        vec!["short"]
    );

    let select_short = ScentMapFilters {
        scent_notes: ScentNoteFilter {
            top_notes: vec!["우디".into()],
            ..ScentNoteFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert_eq!(
        ids(&filter_hotplaces(&[entry_long], &select_short)),
        vec!["long"]
    );
}

#[test]
fn note_matching_ignores_case() {
    let mut p = place("v", "V", Category::Cafe, "서울");
    p.signature_scent.notes = vec!["Vanilla Bean".into()];
    let filters = ScentMapFilters {
        scent_notes: ScentNoteFilter {
            middle_notes: vec!["VANILLA".into()],
            ..ScentNoteFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert_eq!(ids(&filter_hotplaces(&[p], &filters)), vec!["v"]);
}

#[test]
fn notes_union_across_layers() {
    let catalog = catalog();
    let filters = ScentMapFilters {
        scent_notes: ScentNoteFilter {
            top_notes: vec!["베리".into()],
            middle_notes: vec![],
            base_notes: vec!["소금".into()],
        },
        ..ScentMapFilters::default()
    };
    assert_eq!(
        ids(&filter_hotplaces(&catalog, &filters)),
        vec!["osechill", "hyeopjae"]
    );
}

#[test]
fn entry_without_notes_fails_note_filter() {
    let p = place("bare", "Bare", Category::Nature, "강원");
    let filters = ScentMapFilters {
        scent_notes: ScentNoteFilter {
            top_notes: vec!["그린".into()],
            ..ScentNoteFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert!(filter_hotplaces(&[p], &filters).is_empty());
}

#[test]
fn atmosphere_searches_description_and_special_feature() {
    let catalog = catalog();
    let by_feature = ScentMapFilters {
        atmosphere: vec!["절벽".into()],
        ..ScentMapFilters::default()
    };
    assert_eq!(ids(&filter_hotplaces(&catalog, &by_feature)), vec!["huinyeoul"]);

    let by_description = ScentMapFilters {
        atmosphere: vec!["로스터리".into()],
        ..ScentMapFilters::default()
    };
    assert_eq!(ids(&filter_hotplaces(&catalog, &by_description)), vec!["aya"]);
}

#[test]
fn atmosphere_match_is_case_sensitive() {
    let mut p = place("c", "C", Category::Urban, "서울");
    p.atmosphere = "Cozy and calm".into();
    let filters = ScentMapFilters {
        atmosphere: vec!["cozy".into()],
        ..ScentMapFilters::default()
    };
    assert!(filter_hotplaces(&[p], &filters).is_empty());
}

#[test]
fn tags_match_entry_tags_either_way_ignoring_case() {
    let catalog = catalog();
    let filters = ScentMapFilters {
        tags: vec!["roastery cafe".into()],
        ..ScentMapFilters::default()
    };
    // "roastery" (entry tag, lowered) is contained in the selected tag.
    assert_eq!(ids(&filter_hotplaces(&catalog, &filters)), vec!["aya"]);
}

#[test]
fn tags_fall_back_to_name_description_and_feature() {
    let catalog = catalog();
    let by_name = ScentMapFilters {
        tags: vec!["OSECHILL".into()],
        ..ScentMapFilters::default()
    };
    assert_eq!(ids(&filter_hotplaces(&catalog, &by_name)), vec!["osechill"]);

    let by_feature = ScentMapFilters {
        tags: vec!["비양도".into()],
        ..ScentMapFilters::default()
    };
    assert_eq!(ids(&filter_hotplaces(&catalog, &by_feature)), vec!["hyeopjae"]);
}

#[test]
fn entry_without_tags_is_matched_by_name_only() {
    let p = place("n", "Nameplate", Category::Unique, "서울");
    let filters = ScentMapFilters {
        tags: vec!["plate".into()],
        ..ScentMapFilters::default()
    };
    assert_eq!(ids(&filter_hotplaces(&[p], &filters)), vec!["n"]);
}

#[test]
fn featured_flag_requires_featured_entries() {
    let catalog = catalog();
    let filters = ScentMapFilters {
        features: FeatureFilter {
            featured: true,
            ..FeatureFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert_eq!(
        ids(&filter_hotplaces(&catalog, &filters)),
        vec!["osechill", "hyeopjae"]
    );
}

#[test]
fn reserved_feature_flags_never_exclude() {
    let catalog = catalog();
    let filters = ScentMapFilters {
        features: FeatureFilter {
            has_parking: true,
            pet_friendly: true,
            ..FeatureFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert_eq!(filter_hotplaces(&catalog, &filters).len(), catalog.len());
}

#[test]
fn dimensions_combine_with_and() {
    let catalog = catalog();
    let filters = ScentMapFilters {
        region: RegionFilter {
            province: Some("서울".into()),
            ..RegionFilter::default()
        },
        categories: vec![Category::Cafe],
        features: FeatureFilter {
            featured: true,
            ..FeatureFilter::default()
        },
        ..ScentMapFilters::default()
    };
    assert_eq!(ids(&filter_hotplaces(&catalog, &filters)), vec!["osechill"]);
}

#[test]
fn filtering_does_not_mutate_input() {
    let catalog = catalog();
    let snapshot = catalog.clone();
    let filters = ScentMapFilters {
        tags: vec!["강남".into()],
        ..ScentMapFilters::default()
    };
    let _ = filter_hotplaces(&catalog, &filters);
    assert_eq!(catalog, snapshot);
}

// ---------------------------------------------------------------------------
// filter_stats
// ---------------------------------------------------------------------------

#[test]
fn stats_of_empty_sequence_are_zero() {
    let stats = filter_stats(&[]);
    assert_eq!(stats, FilterStats::default());
    assert_eq!(stats.total, 0);
    assert!(stats.by_category.is_empty());
    assert!(stats.by_region.is_empty());
    assert_eq!(stats.featured, 0);
}

#[test]
fn stats_count_categories_regions_and_featured() {
    let stats = filter_stats(&catalog());
    assert_eq!(stats.total, 4);
    assert_eq!(stats.by_category.get(&Category::Cafe), Some(&2));
    assert_eq!(stats.by_category.get(&Category::Coastal), Some(&1));
    assert_eq!(stats.by_category.get(&Category::Nature), None);
    assert_eq!(stats.by_region.get("서울"), Some(&2));
    assert_eq!(stats.by_region.get("부산"), Some(&1));
    assert_eq!(stats.featured, 2);
}

#[test]
fn stats_serialize_with_string_keys() {
    let stats = filter_stats(&catalog()[..1]);
    let json = serde_json::to_value(&stats).expect("serialize");
    assert_eq!(json["byCategory"]["cafe"], 1);
    assert_eq!(json["byRegion"]["서울"], 1);
}

// ---------------------------------------------------------------------------
// has_active_filters
// ---------------------------------------------------------------------------

#[test]
fn default_filters_are_inactive() {
    assert!(!has_active_filters(&ScentMapFilters::default()));
}

#[test]
fn single_tag_activates_filters() {
    let filters = ScentMapFilters {
        tags: vec!["바다뷰".into()],
        ..ScentMapFilters::default()
    };
    assert!(has_active_filters(&filters));
}

#[test]
fn each_dimension_activates_filters() {
    let cases = [
        ScentMapFilters {
            region: RegionFilter {
                district: Some("애월읍".into()),
                ..RegionFilter::default()
            },
            ..ScentMapFilters::default()
        },
        ScentMapFilters {
            categories: vec![Category::Gallery],
            ..ScentMapFilters::default()
        },
        ScentMapFilters {
            scent_notes: ScentNoteFilter {
                middle_notes: vec!["플로럴".into()],
                ..ScentNoteFilter::default()
            },
            ..ScentMapFilters::default()
        },
        ScentMapFilters {
            atmosphere: vec!["고즈넉한".into()],
            ..ScentMapFilters::default()
        },
        ScentMapFilters {
            features: FeatureFilter {
                wheelchair: true,
                ..FeatureFilter::default()
            },
            ..ScentMapFilters::default()
        },
    ];
    for filters in &cases {
        assert!(has_active_filters(filters), "expected active: {filters:?}");
    }
}

#[test]
fn empty_region_strings_stay_inactive() {
    let filters = ScentMapFilters {
        region: RegionFilter {
            province: Some(String::new()),
            city: Some(String::new()),
            district: None,
        },
        ..ScentMapFilters::default()
    };
    assert!(!has_active_filters(&filters));
}

// ---------------------------------------------------------------------------
// search_places
// ---------------------------------------------------------------------------

#[test]
fn blank_search_returns_input_unchanged() {
    let catalog = catalog();
    assert_eq!(search_places(&catalog, ""), catalog);
    assert_eq!(search_places(&catalog, "  "), catalog);
    assert_eq!(search_places(&catalog, "\t\n"), catalog);
}

#[test]
fn search_ignores_case() {
    let catalog = vec![place("s", "Seoul Cafe", Category::Cafe, "서울")];
    assert_eq!(ids(&search_places(&catalog, "seoul")), vec!["s"]);
    assert_eq!(ids(&search_places(&catalog, "SEOUL CAFE")), vec!["s"]);
}

#[test]
fn search_covers_address_scent_name_and_tags() {
    let catalog = catalog();
    assert_eq!(ids(&search_places(&catalog, "영도구")), vec!["huinyeoul"]);
    assert_eq!(ids(&search_places(&catalog, "emerald")), vec!["hyeopjae"]);
    assert_eq!(ids(&search_places(&catalog, "합정")), vec!["osechill"]);
    assert_eq!(ids(&search_places(&catalog, "roastery")), vec!["aya"]);
}

#[test]
fn search_does_not_look_at_notes_or_region() {
    let catalog = catalog();
    assert!(search_places(&catalog, "에스프레소").is_empty());
    assert!(search_places(&catalog, "제주 ").is_empty());
}

#[test]
fn search_term_is_not_trimmed() {
    let mut p = place("t", "Blue Bottle", Category::Cafe, "서울");
    p.description = "bluebottle".into();
    assert_eq!(ids(&search_places(&[p.clone()], "blue ")), vec!["t"]);
    assert!(search_places(&[p], " bottle ").is_empty());
}

#[test]
fn filter_and_search_compose_in_either_order() {
    let catalog = catalog();
    let filters = ScentMapFilters {
        categories: vec![Category::Cafe, Category::Coastal],
        ..ScentMapFilters::default()
    };
    let term = "분위기";

    let filter_first = search_places(&filter_hotplaces(&catalog, &filters), term);
    let search_first = filter_hotplaces(&search_places(&catalog, term), &filters);
    assert_eq!(filter_first, search_first);
    assert_eq!(ids(&filter_first), vec!["osechill", "aya", "hyeopjae"]);
}
