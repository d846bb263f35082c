//! Sample data installation.
//!
//! Installs the default admin account, two sample students, and the
//! starter menu. Safe to run repeatedly: existing accounts and a
//! non-empty menu are left alone.

use thiserror::Error;
use tracing::info;

use crate::{
    access::Role,
    context::AppContext,
    domain::{
        menu::{MenuService, MenuServiceError, models::NewMenuItem},
        students::{StudentsService, StudentsServiceError, models::NewStudent},
        users::{UsersService, UsersServiceError, models::NewUser},
    },
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to seed accounts")]
    Users(#[from] UsersServiceError),

    #[error("failed to seed students")]
    Students(#[from] StudentsServiceError),

    #[error("failed to seed menu")]
    Menu(#[from] MenuServiceError),
}

const SAMPLE_STUDENTS: &[(&str, &str, &str, &str)] = &[
    (
        "sv001",
        "B20DCCN001",
        "Nguyễn Văn A",
        "Công nghệ thông tin",
    ),
    ("sv002", "B20DCCN002", "Trần Thị B", "Kỹ thuật phần mềm"),
];

const SAMPLE_MENU: &[(&str, u64, &str, &str, &str)] = &[
    (
        "Cơm gà xối mỡ",
        35_000,
        "Món chính",
        "Cơm gà vàng ruộm, thấm vị, ăn kèm dưa leo và nước sốt đặc trưng.",
        "🍗",
    ),
    (
        "Phở bò",
        40_000,
        "Món chính",
        "Phở thơm, nước dùng đậm đà, thịt bò mềm và bánh phở tươi.",
        "🍜",
    ),
    (
        "Bún chả",
        30_000,
        "Món chính",
        "Bún tươi kèm chả nướng, nước mắm chua ngọt và rau sống.",
        "🍖",
    ),
    (
        "Bánh mì pate",
        15_000,
        "Đồ ăn nhanh",
        "Bánh mì giòn rụm, pate thơm béo, thêm dưa chuột và hành chua.",
        "🥖",
    ),
    (
        "Xôi gà",
        25_000,
        "Đồ ăn sáng",
        "Xôi dẻo, gà xé thấm gia vị, rắc ruốc và hành phi.",
        "🍚",
    ),
    (
        "Cafe sữa",
        15_000,
        "Đồ uống",
        "Cà phê phin thơm nồng, hòa quyện sữa đặc ngọt dịu.",
        "☕",
    ),
];

/// Install the sample data set.
///
/// # Errors
///
/// Returns an error when any underlying service call fails.
pub async fn install(ctx: &AppContext) -> Result<(), SeedError> {
    install_admin(ctx).await?;
    install_students(ctx).await?;
    install_menu(ctx).await?;

    Ok(())
}

async fn install_admin(ctx: &AppContext) -> Result<(), SeedError> {
    match ctx.users.find_by_username("admin").await {
        Ok(_) => Ok(()),
        Err(UsersServiceError::NotFound) => {
            ctx.users
                .create_user(NewUser {
                    username: "admin".to_string(),
                    password: "admin123".to_string(),
                    role: Role::Admin,
                })
                .await?;

            info!("seeded admin account");

            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

async fn install_students(ctx: &AppContext) -> Result<(), SeedError> {
    for (username, code, full_name, major) in SAMPLE_STUDENTS {
        match ctx.users.find_by_username(username).await {
            Ok(_) => continue,
            Err(UsersServiceError::NotFound) => {}
            Err(error) => return Err(error.into()),
        }

        ctx.students
            .create_student(NewStudent {
                username: (*username).to_string(),
                password: (*username).to_string(),
                student_code: (*code).to_string(),
                full_name: (*full_name).to_string(),
                major: (*major).to_string(),
                email: format!("{username}@student.edu.vn"),
                phone: "0123456789".to_string(),
            })
            .await?;
    }

    Ok(())
}

async fn install_menu(ctx: &AppContext) -> Result<(), SeedError> {
    if !ctx.menu.list_items().await?.is_empty() {
        return Ok(());
    }

    for (name, price, category, description, icon) in SAMPLE_MENU {
        let item = ctx
            .menu
            .create_item(NewMenuItem {
                name: (*name).to_string(),
                price: *price,
                category: (*category).to_string(),
            })
            .await?;

        ctx.menu.set_item_meta(item.id, description, icon).await?;
    }

    info!(items = SAMPLE_MENU.len(), "seeded menu");

    Ok(())
}
