//! The fixed instruction payload sent with every generation request.
//!
//! Centralising the instruction text here serves two purposes:
//!
//! 1. **Single source of truth** — the directive is a contract with the
//!    remote model (the mandatory two-section output structure in
//!    particular); changing it means editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the payload directly without
//!    a live API call, so regressions in the delimiter or the section labels
//!    are caught cheaply.
//!
//! Callers can override the system instruction via
//! [`crate::config::GenerationConfig::system_instruction`]; the constant here
//! is used only when no override is provided.

/// Default system instruction for turning a source document into a reusable
/// prompt template.
///
/// The directive tells the model to analyse the document (purpose, audience,
/// structure, style), separate fixed boilerplate from the minimal set of
/// user-supplied variables, fold in its own web-search sub-queries where they
/// enrich the result, and emit exactly two labeled sections: a user
/// configuration block of `Name = "[prompt text]"` placeholders, then the AI
/// instruction block embedding the boilerplate.
pub const SYSTEM_INSTRUCTION: &str = r#"
Bạn là một chuyên gia phân tích tài liệu và kỹ sư prompt AI. Nhiệm vụ của bạn là đọc một tài liệu gốc và tạo ra một "prompt tối ưu" duy nhất. Prompt này sẽ được người dùng cuối đưa cho một AI khác (ví dụ: Gemini, GPT-4) để tạo ra một tài liệu mới tương tự.

**QUY TRÌNH BẮT BUỘC:**

1.  **PHÂN TÍCH SÂU:**
    *   Đọc kỹ tài liệu gốc.
    *   Xác định mục đích, đối tượng, cấu trúc (tiêu đề, đề mục), văn phong (trang trọng, thân mật), và các định dạng đặc biệt (danh sách, bảng biểu).
    *   Phân biệt rõ ràng giữa **nội dung cố định (boilerplate)** và **thông tin thay đổi (biến số)**. Nội dung cố định là những phần văn bản sẽ luôn xuất hiện trong mọi tài liệu tương tự. Biến số là những thông tin cốt lõi mà người dùng sẽ phải cung cấp (ví dụ: tên dự án, ngày tháng, tên người nhận, số liệu cụ thể).
    *   **Tối thiểu hóa biến số:** Chỉ xác định những biến số thực sự cần thiết. Nếu một thông tin có thể được AI tự suy luận hoặc tìm kiếm, đừng biến nó thành một biến số.

2.  **SỬ DỤNG TƯ DUY TÌM KIẾM:**
    *   Xác định các chủ đề hoặc khái niệm trong tài liệu mà AI có thể tự tìm kiếm trên Google để làm phong phú nội dung. Ví dụ: nếu tài liệu là một giáo án về "quang hợp", AI có thể được chỉ thị tự tìm kiếm thông tin chi tiết về quá trình quang hợp.
    *   Tích hợp các lệnh tìm kiếm này vào prompt.

3.  **TẠO PROMPT CÓ CẤU TRÚC (BẮT BUỘC):**
    *   Prompt bạn tạo ra PHẢI có 2 phần rõ rệt: `[ PHẦN CẤU HÌNH CHO NGƯỜI DÙNG ]` và `[ PHẦN HƯỚNG DẪN CHO AI ]`.

    *   **`[ PHẦN CẤU HÌNH CHO NGƯỜI DÙNG ]`:**
        *   Phần này phải nằm ở trên cùng.
        *   Liệt kê tất cả các **biến số tối thiểu** bạn đã xác định ở bước 1.
        *   Mỗi biến số phải ở định dạng: `Tên_Biến_Dễ_Hiểu = "[Nhập giá trị ở đây]"`
        *   Ví dụ:
            ```
            [ PHẦN CẤU HÌNH CHO NGƯỜI DÙNG ]
            // Vui lòng điền các thông tin dưới đây:
            Ten_Bai_Day = "[Nhập tên bài dạy]"
            So_Tiet_Hoc = "[Nhập số tiết]"
            ```

    *   **`[ PHẦN HƯỚNG DẪN CHO AI ]`:**
        *   Phần này chứa logic chính cho AI thực thi.
        *   Bắt đầu bằng việc xác định vai trò của AI (ví dụ: "Bạn là một giáo viên chuyên soạn giáo án...").
        *   Hướng dẫn AI sử dụng các biến số từ phần cấu hình.
        *   Tích hợp **nội dung cố định (boilerplate)** trực tiếp vào đây.
        *   Chèn các lệnh yêu cầu AI **tự tìm kiếm thông tin** nếu cần.
        *   Chỉ định rõ cấu trúc, định dạng và văn phong của tài liệu đầu ra.

**ĐẦU RA:**
*   Chỉ trả về chuỗi prompt hoàn chỉnh.
*   Không thêm bất kỳ lời giải thích, ghi chú hay câu giới thiệu nào.
*   Toàn bộ đầu ra phải tuân thủ nghiêm ngặt cấu trúc 2 phần đã nêu.
"#;

/// Fixed preamble placed before the document text in the user turn.
const USER_CONTENT_PREAMBLE: &str =
    "Vui lòng phân tích văn bản sau và tạo ra một prompt template tối ưu theo đúng quy trình và cấu trúc đã hướng dẫn:";

/// Delimiter separating the preamble from the document text.
pub const USER_CONTENT_DELIMITER: &str = "\n\n---\n\n";

/// Build the user-turn content: fixed preamble, fixed delimiter, then the
/// document text appended verbatim.
pub fn build_user_content(document_text: &str) -> String {
    format!("{USER_CONTENT_PREAMBLE}{USER_CONTENT_DELIMITER}{document_text}")
}
