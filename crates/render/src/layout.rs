//! 레이아웃 추정기 -- 가변 폭 필드의 줄 수와 행 높이를 계산합니다.
//!
//! 실제 글꼴 메트릭이 아닌 근사치입니다. 열마다 한 줄에 들어가는 글자 수를
//! 고정 상수로 두고 `ceil(길이 / 줄당 글자 수)`로 줄 수를 셉니다.
//! 길이는 바이트가 아닌 `char` 단위입니다.
//!
//! ```
//! use scanreport_render::layout::{estimate_row_height, LayoutField, BASE_HEIGHT, PER_LINE_HEIGHT};
//!
//! let min = estimate_row_height(&[(LayoutField::PackageName, 0), (LayoutField::Title, 0)]);
//! assert_eq!(min, BASE_HEIGHT + PER_LINE_HEIGHT);
//! ```

/// 행의 위아래 여백 합 (mm)
pub const BASE_HEIGHT: f32 = 2.0;

/// 줄 하나의 높이 (mm)
pub const PER_LINE_HEIGHT: f32 = 4.0;

/// 말줄임 표시
const ELLIPSIS: &str = "...";

/// 줄바꿈 대상 필드
///
/// 줄당 글자 수는 문서 표에서 각 필드가 차지하는 열 폭에서 나온 값입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutField {
    /// 좁은 열 (패키지 이름)
    PackageName,
    /// 넓은 열 (제목)
    Title,
    /// 취약점 ID. GHSA ID가 한 줄에 들어감
    Identifier,
    /// 설치/수정 버전
    Version,
    /// 패키지 경로
    Path,
    /// 심각도, 출처, 상태 같은 짧은 값
    Label,
}

impl LayoutField {
    /// 한 줄에 들어가는 글자 수
    pub const fn chars_per_line(self) -> usize {
        match self {
            Self::PackageName => 18,
            Self::Title => 45,
            Self::Identifier => 19,
            Self::Version => 18,
            Self::Path => 15,
            Self::Label => 8,
        }
    }

    /// 길이 `len`인 텍스트의 줄 수. 빈 텍스트도 1줄입니다.
    pub fn line_count(self, len: usize) -> usize {
        len.div_ceil(self.chars_per_line()).max(1)
    }
}

/// 필드별 길이로 행 높이를 추정합니다.
///
/// `BASE_HEIGHT + max(줄 수) * PER_LINE_HEIGHT`. 필드가 하나도 없으면 1줄로 봅니다.
/// 어느 필드의 길이가 늘어도 결과는 줄어들지 않습니다.
pub fn estimate_row_height(fields: &[(LayoutField, usize)]) -> f32 {
    let lines = fields
        .iter()
        .map(|&(field, len)| field.line_count(len))
        .max()
        .unwrap_or(1);
    BASE_HEIGHT + lines as f32 * PER_LINE_HEIGHT
}

/// 셀 텍스트로 행 높이를 추정합니다. 길이는 글자 수로 셉니다.
pub fn text_row_height(cells: &[(LayoutField, &str)]) -> f32 {
    let lengths: Vec<(LayoutField, usize)> = cells
        .iter()
        .map(|&(field, text)| (field, text.chars().count()))
        .collect();
    estimate_row_height(&lengths)
}

/// 텍스트를 필드의 줄당 글자 수로 잘라 줄 목록을 만듭니다.
///
/// 결과 줄 수는 항상 `field.line_count(글자 수)`와 같으므로 추정 높이와 그려지는
/// 높이가 어긋나지 않습니다.
pub fn wrap_lines(text: &str, field: LayoutField) -> Vec<String> {
    let width = field.chars_per_line();
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// 한 줄 셀에 맞게 텍스트를 자릅니다. 넘치면 끝을 `...`로 바꿉니다.
pub fn fit_to_width(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_owned();
    }
    if max_chars <= ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }
    let mut fitted: String = text.chars().take(max_chars - ELLIPSIS.len()).collect();
    fitted.push_str(ELLIPSIS);
    fitted
}
