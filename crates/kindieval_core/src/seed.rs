//! Built-in reference data: a starter catalog, a demo roster and staff users.
//!
//! Every call mints fresh ids. Target codes are the stable identity used to
//! make seeding idempotent.

use crate::model::child::{Child, User, UserRole};
use crate::model::target::{AgeBand, Domain, Target};
use uuid::Uuid;

const TARGETS: [(&str, AgeBand, Domain, &str); 8] = [
    (
        "NT.1824.TC.1",
        AgeBand::Infant18To24Months,
        Domain::Physical,
        "Đi hết đoạn đường hẹp (3m x 0,2m).",
    ),
    (
        "NT.1824.NN.1",
        AgeBand::Infant18To24Months,
        Domain::Language,
        "Phát âm được các từ đơn giản, bắt chước tiếng kêu của các con vật quen thuộc.",
    ),
    (
        "NT.2436.TC.1",
        AgeBand::Infant24To36Months,
        Domain::Physical,
        "Giữ được thăng bằng trong vận động đi/chạy thay đổi tốc độ theo cô.",
    ),
    (
        "NT.2436.NN.1",
        AgeBand::Infant24To36Months,
        Domain::Language,
        "Nói được câu đơn có 2-3 tiếng để biểu đạt nhu cầu.",
    ),
    (
        "MG.34.TC.1",
        AgeBand::Age3To4,
        Domain::Physical,
        "Bò trong đường hẹp (3m x 0,4m) không chệch ra ngoài.",
    ),
    (
        "MG.45.NN.1",
        AgeBand::Age4To5,
        Domain::Language,
        "Nghe hiểu và làm theo được 2, 3 yêu cầu liên tiếp.",
    ),
    (
        "MG.56.NT.1",
        AgeBand::Age5To6,
        Domain::Cognitive,
        "Đếm trong phạm vi 10 và nhận biết các chữ số từ 1-10.",
    ),
    (
        "MG.56.TM.1",
        AgeBand::Age5To6,
        Domain::Aesthetic,
        "Hát đúng giai điệu, lời ca và thể hiện cảm xúc phù hợp với bài hát.",
    ),
];

const CHILDREN: [(&str, &str, &str, AgeBand, &str); 5] = [
    ("Lê Minh Nhật", "2022-08-10", "Nhà trẻ A1", AgeBand::Infant18To24Months, "Cô Thảo"),
    ("Nguyễn An Nhiên", "2020-05-12", "Mầm 1", AgeBand::Age3To4, "Cô Lan"),
    ("Trần Minh Khang", "2021-02-15", "Nhà trẻ B2", AgeBand::Infant24To36Months, "Cô Huệ"),
    ("Lê Bảo Ngọc", "2019-08-20", "Chồi 2", AgeBand::Age4To5, "Cô Thảo"),
    ("Phạm Gia Bảo", "2018-11-05", "Lá 1", AgeBand::Age5To6, "Cô Minh"),
];

pub fn builtin_targets() -> Vec<Target> {
    TARGETS
        .iter()
        .map(|&(code, age_band, domain, content)| Target {
            id: Uuid::new_v4(),
            code: code.to_string(),
            age_band,
            domain,
            content: content.to_string(),
        })
        .collect()
}

pub fn builtin_children() -> Vec<Child> {
    CHILDREN
        .iter()
        .map(|&(name, birth_date, class_label, age_band, teacher)| Child {
            id: Uuid::new_v4(),
            name: name.to_string(),
            birth_date: birth_date.to_string(),
            class_label: class_label.to_string(),
            age_band,
            teacher: teacher.to_string(),
        })
        .collect()
}

/// The administrator first, then the class teacher of `Mầm 1`.
pub fn builtin_users() -> Vec<User> {
    vec![
        User {
            id: "u1".to_string(),
            name: "Ban Giám Hiệu".to_string(),
            role: UserRole::Admin,
            assigned_class: None,
        },
        User {
            id: "u2".to_string(),
            name: "Cô Lan".to_string(),
            role: UserRole::Teacher,
            assigned_class: Some("Mầm 1".to_string()),
        },
    ]
}
