use super::EmploymentKeywords;
use crate::classification::domain::{EmploymentCategory, IndustryRule};
use std::collections::BTreeMap;

const INTERN: &[&str] = &[
    "intern",
    "interns",
    "internship",
    "internships",
    "co-op",
    "实习",
    "实习生",
];

const CAMPUS: &[&str] = &[
    "campus",
    "new grad",
    "new graduate",
    "graduate program",
    "graduate programme",
    "graduate scheme",
    "management trainee",
    "校招",
    "校园招聘",
    "应届",
    "管培生",
];

const NO_EXPERIENCE: &[&str] = &[
    "no experience",
    "no experience required",
    "entry level",
    "entry-level",
    "fresh graduate",
    "fresh graduates",
    "无经验",
    "经验不限",
    "无需经验",
];

const PART_TIME: &[&str] = &["part-time", "part time", "parttime", "兼职", "小时工"];

const MANAGER: &[&str] = &[
    "manager",
    "director",
    "lead",
    "team lead",
    "head of",
    "vp",
    "vice president",
    "principal",
    "chief",
    "senior",
    "经理",
    "总监",
    "主管",
    "负责人",
    "资深",
];

const RAW_TYPES: &[(&str, EmploymentCategory)] = &[
    ("intern", EmploymentCategory::Intern),
    ("internship", EmploymentCategory::Intern),
    ("实习", EmploymentCategory::Intern),
    ("campus", EmploymentCategory::FullTimeCampus),
    ("graduate", EmploymentCategory::FullTimeCampus),
    ("校招", EmploymentCategory::FullTimeCampus),
    ("校园招聘", EmploymentCategory::FullTimeCampus),
    ("part-time", EmploymentCategory::PartTime),
    ("part time", EmploymentCategory::PartTime),
    ("兼职", EmploymentCategory::PartTime),
    ("full-time", EmploymentCategory::FullTimeSocial),
    ("full time", EmploymentCategory::FullTimeSocial),
    ("experienced", EmploymentCategory::FullTimeSocial),
    ("社招", EmploymentCategory::FullTimeSocial),
    ("社会招聘", EmploymentCategory::FullTimeSocial),
    ("全职", EmploymentCategory::FullTimeSocial),
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn employment_keywords() -> EmploymentKeywords {
    EmploymentKeywords {
        intern_keywords: owned(INTERN),
        campus_keywords: owned(CAMPUS),
        parttime_keywords: owned(PART_TIME),
        no_experience_keywords: owned(NO_EXPERIENCE),
        manager_keywords: owned(MANAGER),
        context_keywords: Vec::new(),
        exclusion_keywords: Vec::new(),
        raw_type_map: None,
    }
}

pub(super) fn raw_type_map() -> BTreeMap<String, EmploymentCategory> {
    RAW_TYPES
        .iter()
        .map(|(raw, category)| (raw.to_string(), *category))
        .collect()
}

pub(super) fn industry_rules() -> Vec<IndustryRule> {
    vec![
        IndustryRule::new(
            Some("Technology"),
            Some("Software"),
            Some("Enterprise Software"),
            &["software", "saas", "cloud computing", "软件"],
        ),
        IndustryRule::new(
            Some("Technology"),
            Some("Internet"),
            Some("E-commerce"),
            &["e-commerce", "ecommerce", "online marketplace", "电商", "电子商务"],
        ),
        IndustryRule::new(
            Some("Technology"),
            Some("Internet"),
            None,
            &["internet", "online platform", "互联网"],
        ),
        IndustryRule::new(
            Some("Technology"),
            Some("Semiconductors"),
            None,
            &["semiconductor", "integrated circuit", "芯片", "半导体"],
        ),
        IndustryRule::new(
            Some("Finance"),
            Some("Banking"),
            Some("Commercial Banking"),
            &["bank", "banking", "银行"],
        ),
        IndustryRule::new(
            Some("Finance"),
            Some("Capital Markets"),
            Some("Securities"),
            &["securities", "brokerage", "asset management", "证券", "基金"],
        ),
        IndustryRule::new(
            Some("Finance"),
            Some("Insurance"),
            None,
            &["insurance", "保险"],
        ),
        IndustryRule::new(
            Some("Healthcare"),
            Some("Pharmaceuticals"),
            Some("Biotechnology"),
            &["pharmaceutical", "biotech", "biopharma", "制药", "生物医药"],
        ),
        IndustryRule::new(
            Some("Healthcare"),
            Some("Medical Services"),
            None,
            &["hospital", "medical device", "clinic", "医疗", "医院"],
        ),
        IndustryRule::new(
            Some("Education"),
            Some("Education Services"),
            None,
            &["education", "tutoring", "e-learning", "教育", "培训"],
        ),
        IndustryRule::new(
            Some("Manufacturing"),
            Some("Automotive"),
            None,
            &["automotive", "automobile", "electric vehicle", "汽车"],
        ),
        IndustryRule::new(
            Some("Consumer"),
            Some("Retail"),
            None,
            &["retail", "supermarket", "零售", "超市"],
        ),
        IndustryRule::new(
            Some("Energy"),
            Some("Power & Utilities"),
            None,
            &["renewable energy", "power grid", "photovoltaic", "新能源", "电力"],
        ),
        IndustryRule::new(
            Some("Real Estate"),
            Some("Property Development"),
            None,
            &["real estate", "property development", "房地产", "地产"],
        ),
    ]
}
