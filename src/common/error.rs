// src/common/error.rs

use std::collections::HashMap;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Já existe um entregador com o nome '{0}' neste estabelecimento")]
    DuplicateDeliverer(String),

    #[error("Acesso negado")]
    Forbidden,

    #[error("Arquivo de backup inválido: {0}")]
    InvalidBackup(String),

    #[error("Backup não encontrado: {0}")]
    BackupNotFound(String),

    #[error("Erro de armazenamento: {0}")]
    StorageError(String),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
}

impl AppError {
    /// Achata os erros de validação em `campo -> mensagens`, pronto para a UI.
    /// Para os demais erros, devolve um mapa vazio.
    pub fn field_errors(&self) -> HashMap<String, Vec<String>> {
        let mut details = HashMap::new();
        if let AppError::ValidationError(errors) = self {
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(m) => m.to_string(),
                        None => e.code.to_string(),
                    })
                    .collect();
                details.insert(field.to_string(), messages);
            }
        }
        details
    }

    /// Mensagem curta para mostrar ao usuário.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(_) => "Um ou mais campos são inválidos.".to_string(),
            AppError::DuplicateDeliverer(_) | AppError::Forbidden => self.to_string(),
            AppError::InvalidBackup(_) | AppError::BackupNotFound(_) => self.to_string(),
            // Erros de infraestrutura: loga o detalhe, mostra mensagem genérica.
            e => {
                tracing::error!("Erro interno: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        }
    }
}

// Helper para criar um erro de validação de um único campo
pub fn validation_error(field: &'static str, code: &'static str, message: &str) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    let mut err = validator::ValidationError::new(code);
    err.message = Some(message.to_string().into());
    errors.add(field, err);
    AppError::ValidationError(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_lists_each_invalid_field() {
        let err = validation_error("address", "required", "O endereço é obrigatório.");
        let details = err.field_errors();

        assert_eq!(details.len(), 1);
        assert_eq!(details["address"], vec!["O endereço é obrigatório.".to_string()]);
        assert_eq!(err.user_message(), "Um ou mais campos são inválidos.");
    }

    #[test]
    fn non_validation_errors_have_no_field_details() {
        let err = AppError::DuplicateDeliverer("Ana".into());
        assert!(err.field_errors().is_empty());
        assert!(err.user_message().contains("Ana"));
    }
}
