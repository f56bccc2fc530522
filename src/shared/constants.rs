/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// SUBMISSION LIMITS
// =============================================================================

/// Maximum number of images attached to a report or news item
pub const MAX_IMAGES_PER_SUBMISSION: usize = 5;

/// Maximum size of a single uploaded image (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum length of single-line submission fields (titles, names, area)
pub const MAX_SHORT_TEXT_LENGTH: usize = 255;

/// Body limit for multipart submissions: a full image set plus room for the text fields
pub const MAX_SUBMISSION_BODY_SIZE: usize = MAX_IMAGES_PER_SUBMISSION * MAX_IMAGE_SIZE + 1024 * 1024;

// =============================================================================
// STORAGE FOLDERS
// =============================================================================

pub const AVATARS_FOLDER: &str = "avatars";
pub const REPORTS_FOLDER: &str = "reports";
pub const NEWS_FOLDER: &str = "news";

// =============================================================================
// PLUMBER REGISTRATION OPTIONS
// =============================================================================

pub const PLUMBER_SPECIALTIES: &[&str] = &[
    "إصلاح الأنابيب",
    "تركيب السخانات",
    "إصلاح الحنفيات",
    "تسليك المجاري",
    "تركيب المواسير",
    "إصلاح خزانات المياه",
    "تركيب المضخات",
    "صيانة الحمامات",
    "إصلاح التسريبات",
    "تركيب الفلاتر",
];

pub const PLUMBER_WORKING_AREAS: &[&str] = &[
    "حي أول المحلة - المنشية القديمة",
    "حي أول المحلة - أبو شاهين",
    "حي أول المحلة - سوق اللبن",
    "حي أول المحلة - منطقة 6 أكتوبر",
    "حي أول المحلة - منشية السلام",
    "حي أول المحلة - منطقة الجمهورية",
    "حي أول المحلة - أبو راضي",
    "حي أول المحلة - محب وشكري القوتلي",
    "حي ثاني المحلة - السبع بنات",
    "حي ثاني المحلة - منشية الزهراء",
    "حي ثاني المحلة - منشية البكري",
    "حي ثاني المحلة - المستعمرة",
    "حي ثاني المحلة - الرجبى",
    "حي ثاني المحلة - المنشية الجديدة",
    "حي ثاني المحلة - صندفا",
    "حي ثاني المحلة - الوراقة",
    "المنطقة الصناعية",
    "منشية مبارك",
    "منشية النصر",
    "منشية السادات",
    "الدلتا",
    "محلة البرج",
    "أبو دراع",
    "السكة الوسطى",
];
