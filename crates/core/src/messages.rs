//! Toast texts shown to console users.
//!
//! Kept in one place so tests can assert on the exact wording.

pub const REJECT_REASON_REQUIRED: &str = "Vui lòng nhập lý do từ chối";
pub const SELECT_ACTION_REQUIRED: &str = "Vui lòng chọn hành động";
pub const APPROVE_SUCCESS: &str = "Duyệt thành công";
pub const REJECT_SUCCESS: &str = "Từ chối thành công";
pub const RESOLVE_IN_PROGRESS: &str = "Yêu cầu đang được xử lý";

pub const GENERIC_FAILURE: &str = "Có lỗi xảy ra, vui lòng thử lại";
pub const NETWORK_FAILURE: &str = "Không thể kết nối tới máy chủ";
pub const SESSION_EXPIRED: &str = "Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại";

pub const DUPLICATE_REGISTRATION_NUMBER: &str = "Số đăng ký kinh doanh đã tồn tại";
pub const DUPLICATE_CITIZEN_ID: &str = "Số CCCD đã được sử dụng";
pub const DUPLICATE_EMAIL: &str = "Email đã được sử dụng";
pub const DUPLICATE_TAX_CODE: &str = "Mã số thuế đã tồn tại";
pub const ALREADY_RESOLVED: &str = "Yêu cầu này đã được xử lý trước đó";
pub const NOT_FOUND: &str = "Không tìm thấy dữ liệu";

pub const SAVE_SUCCESS: &str = "Lưu thay đổi thành công";
pub const NO_CHANGES: &str = "Không có thay đổi nào";
pub const RESUBMIT_SUCCESS: &str = "Đã gửi lại hồ sơ để xét duyệt";
pub const CONFIRM_REQUIRED: &str = "Vui lòng xác nhận trước khi gửi lại hồ sơ";
pub const CREATE_SUCCESS: &str = "Thêm mới thành công";
pub const DELETE_SUCCESS: &str = "Xóa thành công";
pub const DELETE_NOT_ALLOWED: &str = "Chỉ có thể xóa hồ sơ đang chờ duyệt";
pub const UPLOAD_SUCCESS: &str = "Tải tệp lên thành công";

pub const AUTHOR_LOCKED: &str = "Không thể thay đổi hoặc xóa tác giả của khóa học";
pub const MEMBER_ALREADY_EXISTS: &str = "Giảng viên đã là thành viên của khóa học";
pub const MEMBER_NOT_FOUND: &str = "Giảng viên không thuộc khóa học";

pub const PROFILE_UPDATED: &str = "Hồ sơ của bạn vừa được cập nhật";
