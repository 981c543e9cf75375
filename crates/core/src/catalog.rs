use serde::Serialize;

pub const DEFAULT_PLATFORMS: [&str; 6] = ["지마켓", "옥션", "11번가", "쿠팡", "네이버", "SSG"];

const CATEGORY_BRANDS: [(&str, &[&str]); 7] = [
    (
        "디지털/가전",
        &["삼성전자", "LG전자", "애플", "소니", "다이슨", "샤오미", "필립스", "로지텍", "쿠쿠", "쿠첸"],
    ),
    (
        "가공식품",
        &[
            "CJ제일제당",
            "오뚜기",
            "농심",
            "동원F&B",
            "대상(청정원)",
            "풀무원",
            "삼양식품",
            "팔도",
            "매일유업",
            "빙그레",
        ],
    ),
    (
        "신선식품",
        &["하림", "목우촌", "팜스코", "선진포크", "본죽", "한우한돈", "우리수산", "프레시지", "마켓컬리"],
    ),
    (
        "건강기능식품",
        &["정관장", "종근당건강", "뉴트리원", "에스더포뮬러", "고려은단", "세노비스", "안국건강", "락토핏"],
    ),
    (
        "생활/리빙",
        &["유한양행", "피앤지", "LG생활건강", "애경", "깨끗한나라", "한샘", "모던하우스", "다이소", "테팔"],
    ),
    (
        "패션/잡화",
        &["나이키", "아디다스", "뉴발란스", "노스페이스", "구찌", "프라다", "지오다노", "무신사스탠다드", "크록스"],
    ),
    (
        "뷰티",
        &["아모레퍼시픽", "올리브영", "설화수", "닥터자르트", "이니스프리", "랑콤", "에스티로더", "헤라", "넘버즈인"],
    ),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub brands: Vec<String>,
}

/// Fixed category and platform vocabulary offered during deal registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Catalog {
    categories: Vec<Category>,
    platforms: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        let categories = CATEGORY_BRANDS
            .iter()
            .map(|(name, brands)| Category {
                name: (*name).to_string(),
                brands: brands.iter().map(|brand| (*brand).to_string()).collect(),
            })
            .collect();
        let platforms = DEFAULT_PLATFORMS.iter().map(|platform| (*platform).to_string()).collect();
        Self::new(categories, platforms)
    }
}

impl Catalog {
    pub fn new(categories: Vec<Category>, platforms: Vec<String>) -> Self {
        Self { categories, platforms }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|category| category.name.as_str()).collect()
    }

    pub fn find(&self, category: &str) -> Option<&Category> {
        self.categories.iter().find(|candidate| candidate.name == category.trim())
    }

    /// Representative brands of `category` in sorted order; empty for an unknown category.
    pub fn brands(&self, category: &str) -> Vec<&str> {
        let mut brands: Vec<&str> = self
            .find(category)
            .map(|category| category.brands.iter().map(String::as_str).collect())
            .unwrap_or_default();
        brands.sort_unstable();
        brands
    }

    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    pub fn is_known_platform(&self, platform: &str) -> bool {
        self.platforms.iter().any(|candidate| candidate == platform.trim())
    }
}

/// Resolves a picked value against a free-text entry. Non-blank free text wins.
pub fn resolve_choice<'a>(picked: &'a str, typed: Option<&'a str>) -> &'a str {
    match typed.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => picked.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_choice, Catalog};

    #[test]
    fn default_catalog_has_seven_categories_and_six_platforms() {
        let catalog = Catalog::default();

        assert_eq!(catalog.categories().len(), 7);
        assert_eq!(catalog.platforms().len(), 6);
        assert_eq!(catalog.category_names()[0], "디지털/가전");
        assert!(catalog.is_known_platform("쿠팡"));
        assert!(!catalog.is_known_platform("티몬"));
    }

    #[test]
    fn brands_are_sorted_and_unknown_category_is_empty() {
        let catalog = Catalog::default();

        let brands = catalog.brands("뷰티");
        let mut sorted = brands.clone();
        sorted.sort_unstable();
        assert_eq!(brands, sorted);
        assert!(brands.contains(&"설화수"));
        assert!(catalog.brands("자동차").is_empty());
    }

    #[test]
    fn free_text_overrides_picked_value_when_not_blank() {
        assert_eq!(resolve_choice("쿠팡", Some(" 티몬 ")), "티몬");
        assert_eq!(resolve_choice("쿠팡", Some("   ")), "쿠팡");
        assert_eq!(resolve_choice("쿠팡", None), "쿠팡");
    }
}
