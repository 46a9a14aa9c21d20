//! Translated interface text.
//!
//! Every label is looked up by a symbolic [`Text`] key, never by its English
//! wording. Each key carries all three language variants, so a missing
//! translation is a compile error rather than a runtime fallback.

use crate::types::{BookingError, BookingStatus, Language, UploadError};

/// One string in each supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variants {
    /// Arabic.
    pub ar: &'static str,
    /// Hebrew.
    pub he: &'static str,
    /// English.
    pub en: &'static str,
}

const fn v(ar: &'static str, he: &'static str, en: &'static str) -> Variants {
    Variants { ar, he, en }
}

/// Symbolic keys for every piece of interface text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    // Layout
    NavHome,
    NavGallery,
    NavBook,
    NavAccount,
    NavSignIn,
    NavSignOut,
    Language,
    ContactWhatsApp,
    WhatsAppGreeting,
    LoadFailure,

    // Home
    HomeTitle,
    HomeTagline,
    HomeCta,

    // Identity
    LoginTitle,
    SignupTitle,
    FullName,
    PhoneNumber,
    LoginSubmit,
    SignupSubmit,
    SwitchToSignup,
    SwitchToLogin,
    Submitting,
    InvalidPhone,
    MissingName,
    UserNotFound,
    UserExists,
    AuthFailure,

    // Gallery
    GalleryTitle,
    GalleryEmpty,
    PreviousImage,
    NextImage,
    DefaultImageTitle,
    DefaultImageDescription,

    // Upload
    UploadTitle,
    UploadSubmit,
    Uploading,
    UploadedCount,
    FailedCount,
    InvalidFileType,
    FileTooLarge,
    UploadPermissionDenied,
    UploadCanceled,
    QuotaExceeded,
    InvalidFormat,
    UploadFailure,
    DeleteImage,
    DeleteStoredFile,
    ImageDeleted,
    ImageNotFound,

    // Booking
    BookTitle,
    PickupAddress,
    DropoffAddress,
    ScheduledFor,
    Notes,
    BookSubmit,
    BookingCreated,
    BookingFailure,
    MissingAddress,
    InvalidSchedule,
    NotesTooLong,
    MyBookings,
    NoBookings,
    StatusPending,
    StatusConfirmed,
    StatusCompleted,
    StatusCancelled,

    // Preferences
    NotificationSound,
    TurnOn,
    TurnOff,

    // Admin
    AdminTitle,
    AdminLoginTitle,
    NotAdmin,
    UsersTitle,
    BookingsTitle,
    UpdateStatus,
    Name,
    Phone,
    CreatedAt,
    Status,
}

impl Text {
    /// The key's text in all three languages.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub const fn variants(self) -> Variants {
        match self {
            Self::NavHome => v("الرئيسية", "ראשי", "Home"),
            Self::NavGallery => v("المعرض", "גלריה", "Gallery"),
            Self::NavBook => v("احجز توصيلة", "הזמנת משלוח", "Book a delivery"),
            Self::NavAccount => v("حسابي", "החשבון שלי", "My account"),
            Self::NavSignIn => v("تسجيل الدخول", "התחברות", "Sign in"),
            Self::NavSignOut => v("تسجيل الخروج", "התנתקות", "Sign out"),
            Self::Language => v("اللغة", "שפה", "Language"),
            Self::ContactWhatsApp => v("تواصل معنا عبر واتساب", "צרו קשר בוואטסאפ", "Chat with us on WhatsApp"),
            Self::WhatsAppGreeting => v(
                "مرحبا، أود الاستفسار عن خدمة التوصيل",
                "שלום, אשמח לפרטים על שירות המשלוחים",
                "Hello, I would like to ask about your delivery service",
            ),

            Self::LoadFailure => v(
                "تعذر تحميل البيانات. حاول لاحقا",
                "לא ניתן לטעון את הנתונים. נסו שוב מאוחר יותר",
                "Could not load this page. Please try again later",
            ),

            Self::HomeTitle => v("تندارو - توصيل محلي", "טנדרו - משלוחים מקומיים", "Tandaro - local delivery"),
            Self::HomeTagline => v(
                "نوصل طلباتك بسرعة وأمان داخل مدينتك",
                "אנחנו מביאים את המשלוח שלך מהר ובבטחה בתוך העיר",
                "Fast, careful deliveries across your city",
            ),
            Self::HomeCta => v("احجز الآن", "הזמינו עכשיו", "Book now"),

            Self::LoginTitle => v("تسجيل الدخول", "התחברות", "Sign in"),
            Self::SignupTitle => v("إنشاء حساب", "הרשמה", "Create an account"),
            Self::FullName => v("الاسم الكامل", "שם מלא", "Full name"),
            Self::PhoneNumber => v("رقم الهاتف", "מספר טלפון", "Phone number"),
            Self::LoginSubmit => v("دخول", "כניסה", "Sign in"),
            Self::SignupSubmit => v("تسجيل", "הרשמה", "Sign up"),
            Self::SwitchToSignup => v("ليس لديك حساب؟ سجل الآن", "אין לך חשבון? הירשם", "No account yet? Sign up"),
            Self::SwitchToLogin => v("لديك حساب؟ سجل الدخول", "כבר רשום? התחבר", "Already registered? Sign in"),
            Self::Submitting => v("جار الإرسال...", "שולח...", "Sending..."),
            Self::InvalidPhone => v(
                "رقم الهاتف غير صالح. أدخل رقم جوال يبدأ بـ 05",
                "מספר הטלפון אינו תקין. יש להזין מספר נייד שמתחיל ב-05",
                "Invalid phone number. Enter a mobile number starting with 05",
            ),
            Self::MissingName => v("الرجاء إدخال الاسم", "נא להזין שם", "Please enter your name"),
            Self::UserNotFound => v(
                "لم يتم العثور على حساب بهذا الرقم. يمكنك التسجيل الآن",
                "לא נמצא חשבון עם המספר הזה. אפשר להירשם עכשיו",
                "No account with this number. You can sign up now",
            ),
            Self::UserExists => v(
                "هذا الرقم مسجل مسبقا. سجل الدخول بدلا من ذلك",
                "המספר הזה כבר רשום. נא להתחבר",
                "This number is already registered. Please sign in",
            ),
            Self::AuthFailure => v(
                "حدث خطأ. حاول مرة أخرى",
                "אירעה שגיאה. נסו שוב",
                "Something went wrong. Please try again",
            ),

            Self::GalleryTitle => v("معرض الصور", "גלריית תמונות", "Photo gallery"),
            Self::GalleryEmpty => v("لا توجد صور بعد", "אין עדיין תמונות", "No photos yet"),
            Self::PreviousImage => v("السابق", "הקודם", "Previous"),
            Self::NextImage => v("التالي", "הבא", "Next"),
            Self::DefaultImageTitle => v("صورة جديدة", "תמונה חדשה", "New photo"),
            Self::DefaultImageDescription => v("من أعمال تندارو", "מהעבודות של טנדרו", "From the Tandaro fleet"),

            Self::UploadTitle => v("رفع صور", "העלאת תמונות", "Upload photos"),
            Self::UploadSubmit => v("رفع", "העלאה", "Upload"),
            Self::Uploading => v("جار الرفع...", "מעלה...", "Uploading..."),
            Self::UploadedCount => v("تم الرفع", "הועלו", "Uploaded"),
            Self::FailedCount => v("فشل", "נכשלו", "Failed"),
            Self::InvalidFileType => v("الملف ليس صورة", "הקובץ אינו תמונה", "File is not an image"),
            Self::FileTooLarge => v(
                "حجم الملف أكبر من 5 ميغابايت",
                "הקובץ גדול מ-5 מגה-בייט",
                "File is larger than 5 MB",
            ),
            Self::UploadPermissionDenied => v(
                "لا توجد صلاحية لرفع الملفات",
                "אין הרשאה להעלות קבצים",
                "Permission denied while uploading",
            ),
            Self::UploadCanceled => v("تم إلغاء الرفع", "ההעלאה בוטלה", "Upload was canceled"),
            Self::QuotaExceeded => v("مساحة التخزين ممتلئة", "נפח האחסון מלא", "Storage quota exceeded"),
            Self::InvalidFormat => v("صيغة الملف غير صالحة", "פורמט הקובץ אינו תקין", "Invalid file format"),
            Self::UploadFailure => v("فشل رفع الملف", "העלאת הקובץ נכשלה", "Upload failed"),
            Self::DeleteImage => v("حذف", "מחיקה", "Delete"),
            Self::DeleteStoredFile => v("حذف الملف المخزن أيضا", "למחוק גם את הקובץ השמור", "Also delete the stored file"),
            Self::ImageDeleted => v("تم حذف الصورة", "התמונה נמחקה", "Photo deleted"),
            Self::ImageNotFound => v("الصورة غير موجودة", "התמונה לא נמצאה", "Photo not found"),

            Self::BookTitle => v("حجز توصيلة", "הזמנת משלוח", "Book a delivery"),
            Self::PickupAddress => v("عنوان الاستلام", "כתובת איסוף", "Pickup address"),
            Self::DropoffAddress => v("عنوان التسليم", "כתובת מסירה", "Drop-off address"),
            Self::ScheduledFor => v("موعد الاستلام", "מועד איסוף", "Pickup time"),
            Self::Notes => v("ملاحظات", "הערות", "Notes"),
            Self::BookSubmit => v("تأكيد الحجز", "אישור הזמנה", "Confirm booking"),
            Self::BookingCreated => v("تم استلام طلبك", "ההזמנה התקבלה", "Your booking was received"),
            Self::BookingFailure => v("تعذر حفظ الحجز", "לא ניתן לשמור את ההזמנה", "Could not save the booking"),
            Self::MissingAddress => v(
                "الرجاء إدخال عنواني الاستلام والتسليم",
                "נא להזין כתובת איסוף וכתובת מסירה",
                "Please enter both pickup and drop-off addresses",
            ),
            Self::InvalidSchedule => v("موعد غير صالح", "מועד לא תקין", "Invalid pickup time"),
            Self::NotesTooLong => v("الملاحظات طويلة جدا", "ההערות ארוכות מדי", "Notes are too long"),
            Self::MyBookings => v("حجوزاتي", "ההזמנות שלי", "My bookings"),
            Self::NoBookings => v("لا توجد حجوزات", "אין הזמנות", "No bookings yet"),
            Self::StatusPending => v("قيد الانتظار", "ממתינה", "Pending"),
            Self::StatusConfirmed => v("مؤكد", "מאושרת", "Confirmed"),
            Self::StatusCompleted => v("مكتمل", "הושלמה", "Completed"),
            Self::StatusCancelled => v("ملغى", "בוטלה", "Cancelled"),

            Self::NotificationSound => v("أصوات الإشعارات", "צלילי התראות", "Notification sounds"),
            Self::TurnOn => v("تشغيل", "הפעלה", "Turn on"),
            Self::TurnOff => v("إيقاف", "כיבוי", "Turn off"),

            Self::AdminTitle => v("لوحة الإدارة", "ניהול", "Admin"),
            Self::AdminLoginTitle => v("دخول الإدارة", "כניסת מנהלים", "Admin sign in"),
            Self::NotAdmin => v(
                "هذا الحساب لا يملك صلاحيات الإدارة",
                "לחשבון הזה אין הרשאות ניהול",
                "This account is not an administrator",
            ),
            Self::UsersTitle => v("المستخدمون", "משתמשים", "Users"),
            Self::BookingsTitle => v("الحجوزات", "הזמנות", "Bookings"),
            Self::UpdateStatus => v("تحديث الحالة", "עדכון סטטוס", "Update status"),
            Self::Name => v("الاسم", "שם", "Name"),
            Self::Phone => v("الهاتف", "טלפון", "Phone"),
            Self::CreatedAt => v("تاريخ الإنشاء", "נוצר", "Created"),
            Self::Status => v("الحالة", "סטטוס", "Status"),
        }
    }

    /// The key's text in `lang`.
    #[must_use]
    pub const fn tr(self, lang: Language) -> &'static str {
        let variants = self.variants();
        match lang {
            Language::Arabic => variants.ar,
            Language::Hebrew => variants.he,
            Language::English => variants.en,
        }
    }
}

impl From<&UploadError> for Text {
    fn from(err: &UploadError) -> Self {
        match err {
            UploadError::InvalidFileType { .. } => Self::InvalidFileType,
            UploadError::FileTooLarge { .. } => Self::FileTooLarge,
            UploadError::PermissionDenied => Self::UploadPermissionDenied,
            UploadError::Canceled => Self::UploadCanceled,
            UploadError::QuotaExceeded => Self::QuotaExceeded,
            UploadError::InvalidFormat => Self::InvalidFormat,
            UploadError::Failure(_) => Self::UploadFailure,
        }
    }
}

impl From<&BookingError> for Text {
    fn from(err: &BookingError) -> Self {
        match err {
            BookingError::MissingAddress => Self::MissingAddress,
            BookingError::InvalidSchedule(_) => Self::InvalidSchedule,
            BookingError::NotesTooLong { .. } => Self::NotesTooLong,
            BookingError::UnknownStatus(_) => Self::BookingFailure,
        }
    }
}

impl From<BookingStatus> for Text {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Pending => Self::StatusPending,
            BookingStatus::Confirmed => Self::StatusConfirmed,
            BookingStatus::Completed => Self::StatusCompleted,
            BookingStatus::Cancelled => Self::StatusCancelled,
        }
    }
}

/// Translator bound to the request's language, handed to templates.
///
/// Templates call `i18n.t(Text::Key)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I18n {
    lang: Language,
}

impl I18n {
    /// Create a translator for `lang`.
    #[must_use]
    pub const fn new(lang: Language) -> Self {
        Self { lang }
    }

    /// The active language.
    #[must_use]
    pub const fn lang(&self) -> Language {
        self.lang
    }

    /// Translate a key.
    #[must_use]
    pub const fn t(&self, key: Text) -> &'static str {
        key.tr(self.lang)
    }

    /// Translate a booking status.
    #[must_use]
    pub fn status(&self, status: &BookingStatus) -> &'static str {
        Text::from(*status).tr(self.lang)
    }

    /// `lang` attribute value.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.lang.code()
    }

    /// `dir` attribute value.
    #[must_use]
    pub const fn dir(&self) -> &'static str {
        self.lang.dir()
    }
}
