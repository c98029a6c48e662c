use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum StudySessions {
    Table,
    Id,
    UserId,
    ClassId,
    SessionDate,
    DurationMinutes,
    Comments,
    IsShared,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassSummaries {
    Table,
    Id,
    ClassId,
    UserId,
    Content,
    Homework,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudySessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudySessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudySessions::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudySessions::ClassId).big_integer().null())
                    .col(
                        ColumnDef::new(StudySessions::SessionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudySessions::DurationMinutes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StudySessions::Comments)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(StudySessions::IsShared)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(StudySessions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(StudySessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StudySessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_study_sessions_user")
                    .table(StudySessions::Table)
                    .col(StudySessions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClassSummaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassSummaries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassSummaries::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSummaries::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSummaries::Content).text().not_null())
                    .col(ColumnDef::new(ClassSummaries::Homework).text().null())
                    .col(
                        ColumnDef::new(ClassSummaries::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ClassSummaries::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassSummaries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_summaries_user")
                    .table(ClassSummaries::Table)
                    .col(ClassSummaries::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_summaries_class")
                    .table(ClassSummaries::Table)
                    .col(ClassSummaries::ClassId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(ClassSummaries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(StudySessions::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
