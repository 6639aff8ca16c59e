use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建单词本表
        manager
            .create_table(
                Table::create()
                    .table(Word::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Word::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Word::English).string_len(100).not_null())
                    .col(ColumnDef::new(Word::Japanese).string_len(100).not_null())
                    .col(ColumnDef::new(Word::Pronunciation).string_len(100).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Word::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Word {
    Table,
    Id,
    English,
    Japanese,
    Pronunciation,
}
