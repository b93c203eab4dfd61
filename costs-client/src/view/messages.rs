//! Status messages shown by the project page.

pub const LOAD_FAILED: &str = "Erro ao carregar projeto";

pub const BUDGET_BELOW_COST: &str = "O Orçamento não pode ser menor que o custo do projeto!";
pub const PROJECT_UPDATED: &str = "Projeto atualizado!";
pub const UPDATE_FAILED: &str = "Erro ao atualizar projeto";

pub const BUDGET_EXCEEDED: &str = "Orçamento ultrapassado, verifique o valor do serviço!";
pub const SERVICE_ADDED: &str = "Serviço adicionado!";
pub const ADD_FAILED: &str = "Erro ao adicionar serviço";

pub const SERVICE_REMOVED: &str = "Serviço removido com sucesso!";
pub const REMOVE_FAILED: &str = "Erro ao remover serviço";
