//! Menu advisor snapshot.
//!
//! The suggestion chatbot is an external collaborator; this module only
//! defines the data it is given: a read-only snapshot of the available
//! menu and the prompt text built from it. No network calls happen here.

use serde::Serialize;

use crate::domain::menu::models::MenuItem;

/// One menu entry as the chatbot sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub name: String,
    pub price: u64,
    pub category: String,
}

/// Read-only capture of the orderable menu at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl MenuSnapshot {
    /// Capture the available subset of `items`.
    #[must_use]
    pub fn from_items(items: &[MenuItem]) -> Self {
        let entries = items
            .iter()
            .filter(|item| item.is_available)
            .map(|item| SnapshotEntry {
                name: item.name.clone(),
                price: item.price,
                category: item.category.clone(),
            })
            .collect();

        Self { entries }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SnapshotEntry> {
        self.entries.iter()
    }

    fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "- {}: {}đ ({})\n",
                    entry.name,
                    group_thousands(entry.price),
                    entry.category
                )
            })
            .collect()
    }
}

/// Deterministic prompt handed to the generative-language collaborator.
#[must_use]
pub fn suggestion_prompt(snapshot: &MenuSnapshot, question: &str) -> String {
    format!(
        "Bạn là chatbot hỗ trợ căng tin trường học. Dưới đây là menu hiện có:\n\
         \n\
         {menu}\n\
         Hãy sử dụng thông tin menu trên để:\n\
         - Gợi ý món ăn phù hợp với yêu cầu\n\
         - Tư vấn về giá cả\n\
         - Phân loại món theo bữa ăn (sáng, trưa, tối)\n\
         - Hỗ trợ chọn món theo ngân sách\n\
         \n\
         Câu hỏi của người dùng: {question}\n\
         \n\
         Lưu ý:\n\
         - Chỉ gợi ý các món có trong menu trên\n\
         - Đề cập đến giá cả cụ thể\n\
         - Trả lời thân thiện, hữu ích\n\
         - Nếu không có thông tin, hãy nói rõ\n",
        menu = snapshot.render(),
    )
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}
